// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, Collection};
use crate::error::ValidationError;
use crate::models::InssRecord;
use crate::period::{MonthKey, parse_date_input};
use crate::utils::{maybe_print_json, parse_amount, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => {
            let mut records: Vec<InssRecord> = db::load(conn, Collection::Inss)?;
            records.sort_by(|a, b| b.due_date.cmp(&a.due_date));
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
                let data = records
                    .iter()
                    .map(|r| {
                        vec![
                            r.competency.clone(),
                            format!("{:.2}", r.base_salary),
                            format!("{}%", r.rate),
                            format!("{:.2}", r.amount),
                            r.due_date.to_string(),
                            r.status.as_str().to_string(),
                            r.transaction_id.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Competency", "Base", "Rate", "Amount (BRL)", "Due", "Status", "Tx"],
                        data
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub.get_one::<String>("id"), "id")?;
            if db::delete(conn, Collection::Inss, id)? {
                println!("Removed INSS record '{}'", id);
            } else {
                println!("No INSS record '{}'", id);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Contribution owed on `base` at `rate` percent, rounded to cents.
pub fn contribution(base: Decimal, rate: Decimal) -> Result<Decimal, ValidationError> {
    base.checked_mul(rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(|v| v.round_dp(2))
        .ok_or_else(|| ValidationError::InvalidAmount(format!("{} x {}%", base, rate)))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let competency: MonthKey =
        required(sub.get_one::<String>("competency"), "competency")?.parse()?;
    let base = parse_amount(required(sub.get_one::<String>("base"), "base")?)?;
    let rate = parse_amount(required(sub.get_one::<String>("rate"), "rate")?)?;
    let record = InssRecord {
        id: format!("inss-{}", competency),
        competency: competency.to_string(),
        base_salary: base,
        rate,
        amount: contribution(base, rate)?,
        due_date: parse_date_input(required(sub.get_one::<String>("due"), "due")?)?,
        status: required(sub.get_one::<String>("status"), "status")?.parse()?,
        transaction_id: sub
            .get_one::<String>("tx")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };
    db::save(conn, Collection::Inss, &record.id, &record)?;
    println!(
        "INSS {} recorded: {:.2} BRL due {}",
        record.competency, record.amount, record.due_date
    );
    Ok(())
}
