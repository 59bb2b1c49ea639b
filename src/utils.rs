// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use anyhow::Result;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::normalize::{max_amount, parse_decimal_text};

const UA: &str = concat!("homeledger/", env!("CARGO_PKG_VERSION"));

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber once. `RUST_LOG` wins over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let level = match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("homeledger={}", level)));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Amount typed by the user; accepts the same shapes as imported files.
pub fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    let d = parse_decimal_text(s).ok_or_else(|| ValidationError::InvalidAmount(s.to_string()))?;
    if d <= Decimal::ZERO {
        return Err(ValidationError::NotPositive {
            field: "amount",
            value: s.trim().to_string(),
        });
    }
    if d > max_amount() {
        return Err(ValidationError::OutOfRange {
            field: "amount",
            value: s.trim().to_string(),
        });
    }
    Ok(d)
}

pub fn required<'a>(
    v: Option<&'a String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    v.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::Required(field))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_pct(p: Option<Decimal>) -> String {
    match p {
        Some(v) => format!("{:.2}%", v.round_dp(2)),
        None => "-".to_string(),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
