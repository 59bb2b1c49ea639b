// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, Collection, Snapshot};
use crate::index::CategoryIndex;
use crate::models::Budget;
use crate::period::MonthKey;
use crate::utils::{maybe_print_json, parse_amount, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub.get_one::<String>("id"), "id")?;
            if db::delete(conn, Collection::Budgets, id)? {
                println!("Removed budget '{}'", id);
            } else {
                println!("No budget '{}'", id);
            }
        }
        _ => {}
    }
    Ok(())
}

/// One row per (month, country, category, item); setting it again overwrites.
pub fn budget_id(b: &Budget) -> String {
    format!(
        "{:04}-{:02}:{}:{}:{}",
        b.year,
        b.month,
        b.country,
        b.category_id,
        b.account_item_id.as_deref().unwrap_or("*")
    )
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month: MonthKey = required(sub.get_one::<String>("month"), "month")?.parse()?;
    let mut budget = Budget {
        id: String::new(),
        category_id: required(sub.get_one::<String>("category"), "category")?.to_string(),
        account_item_id: sub
            .get_one::<String>("item")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        year: month.year(),
        month: month.month(),
        country: required(sub.get_one::<String>("country"), "country")?.parse()?,
        amount: parse_amount(required(sub.get_one::<String>("amount"), "amount")?)?,
    };
    budget.id = budget_id(&budget);
    db::save(conn, Collection::Budgets, &budget.id, &budget)?;
    println!(
        "Budget set for {} / {} = {:.2} {}",
        month,
        budget.category_id,
        budget.amount,
        budget.country.currency()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let snap = Snapshot::load(conn)?;
    let month: Option<MonthKey> = sub
        .get_one::<String>("month")
        .map(|m| m.parse())
        .transpose()?;
    let mut rows: Vec<&Budget> = snap
        .budgets
        .iter()
        .filter(|b| month.is_none() || b.month_key() == month)
        .collect();
    rows.sort_by(|a, b| {
        (b.year, b.month)
            .cmp(&(a.year, a.month))
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let index = CategoryIndex::build(&snap.categories);
    let data = rows
        .iter()
        .map(|b| {
            vec![
                format!("{:04}-{:02}", b.year, b.month),
                b.country.to_string(),
                index.category_name(&b.category_id).to_string(),
                b.account_item_id
                    .as_deref()
                    .map(|i| index.item_name(&b.category_id, i).to_string())
                    .unwrap_or_default(),
                format!("{:.2} {}", b.amount, b.country.currency()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Country", "Category", "Item", "Budget"], data)
    );
    Ok(())
}
