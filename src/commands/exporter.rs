// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::{IcsOptions, export_ics};
use crate::commands::{resolve_period, resolve_view, today};
use crate::config::Config;
use crate::db::Snapshot;
use crate::fx::ViewMode;
use crate::index::CategoryIndex;
use crate::models::Transaction;
use crate::period::Period;
use crate::utils::required;
use anyhow::{Result, bail};
use chrono::Utc;
use rusqlite::Connection;
use std::str::FromStr;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let format: ExportFormat =
                required(sub.get_one::<String>("format"), "format")?.parse()?;
            let out = required(sub.get_one::<String>("out"), "out")?;
            let config = Config::load(conn)?;
            let period = resolve_period(sub, today())?;
            let view = resolve_view(sub, &config)?;
            let n = export_transactions(conn, format, out, period, view)?;
            println!("Exported {} transactions to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Ics,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "ics" | "ical" => Ok(ExportFormat::Ics),
            other => bail!("Unknown format: {} (use csv|json|ics)", other),
        }
    }
}

/// Write the transactions visible in `view` whose payment date falls in
/// `period`. Returns how many were written.
pub fn export_transactions(
    conn: &Connection,
    format: ExportFormat,
    out: &str,
    period: Period,
    view: ViewMode,
) -> Result<usize> {
    let snap = Snapshot::load(conn)?;
    let index = CategoryIndex::build(&snap.categories);
    let mut rows: Vec<&Transaction> = snap
        .transactions
        .iter()
        .filter(|t| view.includes(t.country) && period.contains(t.date))
        .collect();
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "competency",
                "type",
                "country",
                "category",
                "item",
                "amount",
                "currency",
                "description",
                "status",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_string(),
                    t.competency_date.map(|d| d.to_string()).unwrap_or_default(),
                    t.r#type.as_str().to_string(),
                    t.country.to_string(),
                    index.category_name(&t.category_id).to_string(),
                    index.item_name(&t.category_id, &t.account_item_id).to_string(),
                    format!("{:.2}", t.amount),
                    t.country.currency().to_string(),
                    t.description.clone(),
                    t.status.as_str().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        ExportFormat::Ics => {
            let owned: Vec<Transaction> = rows.iter().map(|t| (*t).clone()).collect();
            let opts = IcsOptions {
                period,
                view,
                stamp: Utc::now().naive_utc(),
            };
            std::fs::write(out, export_ics(&owned, &snap.inss, &index, &opts))?;
        }
    }
    info!(count = rows.len(), out, ?format, "export written");
    Ok(rows.len())
}
