// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ValidationError;
use crate::fx::{RateTable, ViewMode, fallback_eur_brl};
use crate::utils::{get_setting, set_setting};

pub const DEFAULT_PROJECTION_MONTHS: usize = 6;

/// Household preferences kept in the `settings` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub view: ViewMode,
    pub projection_months: usize,
    pub fallback_rate: Decimal,
    pub last_rate: Option<Decimal>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            projection_months: DEFAULT_PROJECTION_MONTHS,
            fallback_rate: fallback_eur_brl(),
            last_rate: None,
        }
    }
}

impl Config {
    /// Unreadable stored values fall back to their defaults.
    pub fn load(conn: &Connection) -> Result<Self> {
        let d = Config::default();
        Ok(Config {
            view: get_setting(conn, "view")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.view),
            projection_months: get_setting(conn, "projection_months")?
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(d.projection_months),
            fallback_rate: get_setting(conn, "fallback_rate")?
                .and_then(|v| v.parse().ok())
                .filter(|r: &Decimal| *r > Decimal::ZERO)
                .unwrap_or(d.fallback_rate),
            last_rate: get_setting(conn, "last_rate")?
                .and_then(|v| v.parse().ok())
                .filter(|r: &Decimal| *r > Decimal::ZERO),
        })
    }

    pub fn rate(&self) -> Decimal {
        self.last_rate.unwrap_or(self.fallback_rate)
    }

    pub fn rates(&self) -> RateTable {
        RateTable::eur_brl(self.rate())
    }
}

/// Validate and store one setting.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    let stored = match key {
        "view" => value.parse::<ViewMode>()?.to_string(),
        "projection_months" => match value.parse::<usize>() {
            Ok(n) if n > 0 => n.to_string(),
            _ => {
                return Err(ValidationError::NotPositive {
                    field: "projection_months",
                    value: value.to_string(),
                }
                .into());
            }
        },
        "fallback_rate" => crate::utils::parse_amount(value)?.to_string(),
        other => return Err(ValidationError::UnknownSetting(other.to_string()).into()),
    };
    set_setting(conn, key, &stored)
}
