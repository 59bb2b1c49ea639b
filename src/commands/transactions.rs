// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{resolve_period, resolve_view, today};
use crate::config::Config;
use crate::db::{self, Collection, Snapshot};
use crate::index::CategoryIndex;
use crate::models::{Origin, Transaction, TxStatus};
use crate::period::parse_date_input;
use crate::utils::{maybe_print_json, new_id, parse_amount, pretty_table, required};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub.get_one::<String>("id"), "id")?;
            if db::delete(conn, Collection::Transactions, id)? {
                println!("Removed transaction '{}'", id);
            } else {
                println!("No transaction '{}'", id);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Build a transaction from `tx add` arguments without touching the store.
pub fn from_args(sub: &clap::ArgMatches) -> Result<Transaction> {
    let date = parse_date_input(required(sub.get_one::<String>("date"), "date")?)?;
    let competency = sub
        .get_one::<String>("competency")
        .map(|s| parse_date_input(s))
        .transpose()?;
    let opt = |k: &str| {
        sub.get_one::<String>(k)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Ok(Transaction {
        id: opt("id").unwrap_or_else(new_id),
        r#type: required(sub.get_one::<String>("type"), "type")?.parse()?,
        country: required(sub.get_one::<String>("country"), "country")?.parse()?,
        category_id: required(sub.get_one::<String>("category"), "category")?.to_string(),
        account_item_id: required(sub.get_one::<String>("item"), "item")?.to_string(),
        payment_method_id: opt("method"),
        amount: parse_amount(required(sub.get_one::<String>("amount"), "amount")?)?,
        date,
        competency_date: competency,
        description: required(sub.get_one::<String>("description"), "description")?.to_string(),
        note: opt("note"),
        supplier: opt("supplier"),
        status: required(sub.get_one::<String>("status"), "status")?.parse()?,
        origin: Origin::Manual,
        recurrence: None,
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tx = from_args(sub)?;
    db::save(conn, Collection::Transactions, &tx.id, &tx)?;
    println!(
        "Recorded {} {} {:.2} {} on {} ({})",
        tx.r#type.as_str(),
        tx.description,
        tx.amount,
        tx.country.currency(),
        tx.date,
        tx.id
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub.get_one::<String>("id"), "id")?;
    let snap = Snapshot::load(conn)?;
    let mut tx = snap
        .transactions
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_date_input(d)?;
    }
    tx.status = TxStatus::Paid;
    db::save(conn, Collection::Transactions, &tx.id, &tx)?;
    println!("Marked '{}' paid on {}", tx.id, tx.date);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snap = Snapshot::load(conn)?;
    let config = Config::load(conn)?;
    let data = query_rows(&snap, &config, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.item.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Description", "Amount", "CCY", "Category", "Item", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub item: String,
    pub status: String,
}

pub fn query_rows(
    snap: &Snapshot,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let period = resolve_period(sub, today())?;
    let view = resolve_view(sub, config)?;
    let status: Option<TxStatus> = sub
        .get_one::<String>("status")
        .map(|s| s.parse())
        .transpose()?;
    let index = CategoryIndex::build(&snap.categories);
    let category = sub
        .get_one::<String>("category")
        .map(|c| index.find(c).map(|cat| cat.id.clone()).unwrap_or_else(|| c.clone()));

    let mut matched: Vec<&Transaction> = snap
        .transactions
        .iter()
        .filter(|t| view.includes(t.country) && period.contains(t.resolved_date()))
        .filter(|t| category.as_ref().is_none_or(|c| &t.category_id == c))
        .filter(|t| status.is_none_or(|s| t.status == s))
        .collect();
    matched.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        matched.truncate(*limit);
    }

    Ok(matched
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            r#type: t.r#type.as_str().to_string(),
            description: t.description.clone(),
            amount: format!("{:.2}", t.amount),
            currency: t.country.currency().to_string(),
            category: index.category_name(&t.category_id).to_string(),
            item: index.item_name(&t.category_id, &t.account_item_id).to_string(),
            status: t.status.as_str().to_string(),
        })
        .collect())
}
