// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, Collection};
use crate::index::CategoryIndex;
use crate::models::{Category, Origin};
use crate::normalize::{RawTransaction, normalize_transaction};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::Connection;
use serde_json::Value;
use tracing::{debug, info};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").map(|s| s.trim()).unwrap_or_default();
            let summary = import_transactions(conn, path)?;
            println!(
                "Imported {} transactions from {} ({} skipped)",
                summary.imported, path, summary.skipped
            );
            Ok(())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

fn column(headers: &StringRecord, rec: &StringRecord, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|n| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(n)))
        .and_then(|i| rec.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Rows that cannot be normalized are counted and skipped; the rest are
/// written in one database transaction.
pub fn import_transactions(conn: &mut Connection, path: &str) -> Result<ImportSummary> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;
    let headers = rdr.headers()?.clone();

    let tx = conn.transaction()?;
    let cats: Vec<Category> = db::load(&tx, Collection::Categories)?;
    let index = CategoryIndex::build(&cats);
    let mut summary = ImportSummary::default();

    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let get = |names: &[&str]| column(&headers, &rec, names);

        let category = get(&["category", "categoria"]);
        let found = category.as_deref().and_then(|c| index.find(c));
        let category_id = found.map(|c| c.id.clone()).or(category);
        let item = get(&["item", "account_item", "conta"]).map(|i| {
            found
                .and_then(|c| c.items.iter().find(|it| it.name.eq_ignore_ascii_case(&i)))
                .map(|it| it.id.clone())
                .unwrap_or(i)
        });

        let raw = RawTransaction {
            id: get(&["id"]),
            kind: get(&["type", "tipo"]),
            country: get(&["country", "pais"]),
            category_id,
            account_item_id: item,
            payment_method_id: get(&["method", "payment_method"]),
            amount: get(&["amount", "valor"]).map(Value::String).unwrap_or(Value::Null),
            date: get(&["date", "data"]),
            due_date: get(&["due_date", "vencimento"]),
            payment_date: get(&["payment_date"]),
            competency_date: get(&["competency", "competency_date", "competencia"]),
            description: get(&["description", "descricao"]),
            note: get(&["note", "obs"]),
            supplier: get(&["supplier", "fornecedor"]),
            status: get(&["status"]),
            origin: None,
            recurrence: None,
        };
        match normalize_transaction(raw) {
            Some(mut t) => {
                t.origin = Origin::Imported;
                db::save(&tx, Collection::Transactions, &t.id, &t)?;
                summary.imported += 1;
            }
            None => {
                debug!(line = line + 2, "skipping unusable CSV row");
                summary.skipped += 1;
            }
        }
    }
    tx.commit()?;
    info!(imported = summary.imported, skipped = summary.skipped, path, "import finished");
    Ok(summary)
}
