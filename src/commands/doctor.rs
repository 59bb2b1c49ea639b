// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, Collection, Snapshot};
use crate::index::CategoryIndex;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::Value;

/// Data problems the engines silently tolerate, as `(issue, detail)` rows.
pub fn diagnose(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let snap = Snapshot::load(conn)?;
    let index = CategoryIndex::build(&snap.categories);
    let mut rows = Vec::new();

    let raw_tx: Vec<Value> = db::load(conn, Collection::Transactions)?;
    let dropped = raw_tx.len().saturating_sub(snap.transactions.len());
    if dropped > 0 {
        rows.push(vec![
            "unusable_transaction".into(),
            format!("{} stored transactions could not be read", dropped),
        ]);
    }
    let raw_budgets: Vec<Value> = db::load(conn, Collection::Budgets)?;
    let dropped = raw_budgets.len().saturating_sub(snap.budgets.len());
    if dropped > 0 {
        rows.push(vec![
            "unusable_budget".into(),
            format!("{} stored budgets could not be read", dropped),
        ]);
    }

    for t in &snap.transactions {
        match index.category(&t.category_id) {
            None => rows.push(vec![
                "unknown_category".into(),
                format!("tx {} -> '{}'", t.id, t.category_id),
            ]),
            Some(c) if !c.items.iter().any(|i| i.id == t.account_item_id) => rows.push(vec![
                "unknown_item".into(),
                format!("tx {} -> '{}/{}'", t.id, t.category_id, t.account_item_id),
            ]),
            Some(_) => {}
        }
    }
    for b in &snap.budgets {
        if index.category(&b.category_id).is_none() {
            rows.push(vec![
                "budget_unknown_category".into(),
                format!("budget {} -> '{}'", b.id, b.category_id),
            ]);
        }
    }
    for r in &snap.receipts {
        if !snap.transactions.iter().any(|t| t.id == r.transaction_id) {
            rows.push(vec![
                "receipt_orphan".into(),
                format!("receipt {} -> tx '{}'", r.id, r.transaction_id),
            ]);
        }
    }
    for r in &snap.inss {
        if let Some(tx) = &r.transaction_id {
            if !snap.transactions.iter().any(|t| &t.id == tx) {
                rows.push(vec![
                    "inss_orphan".into(),
                    format!("{} -> tx '{}'", r.competency, tx),
                ]);
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
