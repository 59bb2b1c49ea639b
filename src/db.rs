// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::models::{Budget, Category, InssRecord, InvestmentAsset, Receipt, Transaction};
use crate::normalize::{RawBudget, RawTransaction, normalize_budgets, normalize_transactions};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Homeledger", "homeledger"));

pub const DB_ENV: &str = "HOMELEDGER_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("homeledger.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "document store opened");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- one JSON document per entity
    CREATE TABLE IF NOT EXISTS documents(
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(collection, id)
    );
    CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
    "#,
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Transactions,
    Categories,
    Budgets,
    Assets,
    Receipts,
    Inss,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Categories => "categories",
            Collection::Budgets => "budgets",
            Collection::Assets => "assets",
            Collection::Receipts => "receipts",
            Collection::Inss => "inss",
        }
    }
}

/// Insert or overwrite; the last write for an id wins.
pub fn save<T: Serialize>(conn: &Connection, col: Collection, id: &str, doc: &T) -> Result<()> {
    let body = serde_json::to_string(doc)?;
    conn.execute(
        "INSERT INTO documents(collection, id, body) VALUES (?1, ?2, ?3)
         ON CONFLICT(collection, id) DO UPDATE SET body=excluded.body, updated_at=datetime('now')",
        params![col.as_str(), id, body],
    )
    .with_context(|| format!("Save {} '{}'", col.as_str(), id))?;
    debug!(collection = col.as_str(), id, "document saved");
    Ok(())
}

pub fn delete(conn: &Connection, col: Collection, id: &str) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM documents WHERE collection=?1 AND id=?2",
            params![col.as_str(), id],
        )
        .with_context(|| format!("Delete {} '{}'", col.as_str(), id))?;
    Ok(n > 0)
}

pub fn get<T: DeserializeOwned>(conn: &Connection, col: Collection, id: &str) -> Result<Option<T>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection=?1 AND id=?2",
            params![col.as_str(), id],
            |r| r.get(0),
        )
        .optional()?;
    match body {
        Some(b) => Ok(Some(serde_json::from_str(&b).with_context(|| {
            format!("Invalid {} document '{}'", col.as_str(), id)
        })?)),
        None => Ok(None),
    }
}

/// Every decodable document of a collection with its store id, ordered by id.
pub fn load_entries<T: DeserializeOwned>(
    conn: &Connection,
    col: Collection,
) -> Result<Vec<(String, T)>> {
    let mut stmt =
        conn.prepare("SELECT id, body FROM documents WHERE collection=?1 ORDER BY id")?;
    let rows = stmt.query_map(params![col.as_str()], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, body) = row?;
        match serde_json::from_str::<T>(&body) {
            Ok(doc) => out.push((id, doc)),
            Err(e) => warn!(
                collection = col.as_str(),
                %id,
                error = %e,
                "skipping undecodable document"
            ),
        }
    }
    Ok(out)
}

/// Every decodable document of a collection, ordered by id.
pub fn load<T: DeserializeOwned>(conn: &Connection, col: Collection) -> Result<Vec<T>> {
    Ok(load_entries(conn, col)?
        .into_iter()
        .map(|(_, doc)| doc)
        .collect())
}

// A body without its own id takes the id it is stored under.
fn keyed(stored: String, id: &mut Option<String>) {
    if id.as_deref().is_none_or(|v| v.trim().is_empty()) {
        *id = Some(stored);
    }
}

/// The full household data set the engines work on.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub assets: Vec<InvestmentAsset>,
    pub inss: Vec<InssRecord>,
    pub receipts: Vec<Receipt>,
}

impl Snapshot {
    pub fn load(conn: &Connection) -> Result<Self> {
        let raw_tx = load_entries::<RawTransaction>(conn, Collection::Transactions)?
            .into_iter()
            .map(|(stored, mut raw)| {
                keyed(stored, &mut raw.id);
                raw
            });
        let raw_budgets = load_entries::<RawBudget>(conn, Collection::Budgets)?
            .into_iter()
            .map(|(stored, mut raw)| {
                keyed(stored, &mut raw.id);
                raw
            });
        let snap = Snapshot {
            transactions: normalize_transactions(raw_tx),
            categories: load(conn, Collection::Categories)?,
            budgets: normalize_budgets(raw_budgets),
            assets: load(conn, Collection::Assets)?,
            inss: load(conn, Collection::Inss)?,
            receipts: load(conn, Collection::Receipts)?,
        };
        debug!(
            transactions = snap.transactions.len(),
            categories = snap.categories.len(),
            budgets = snap.budgets.len(),
            "snapshot loaded"
        );
        Ok(snap)
    }
}
