// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod assets;
pub mod budgets;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod fx;
pub mod importer;
pub mod inss;
pub mod receipts;
pub mod reports;
pub mod settings;
pub mod transactions;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::config::Config;
use crate::fx::ViewMode;
use crate::period::{MonthKey, Period, PeriodPreset, parse_date_input};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `--from/--to` beat `--period`; with neither, the current month.
pub fn resolve_period(sub: &clap::ArgMatches, today: NaiveDate) -> Result<Period> {
    let from = sub.get_one::<String>("from");
    let to = sub.get_one::<String>("to");
    if from.is_some() || to.is_some() {
        let start = from.map(|s| parse_date_input(s)).transpose()?;
        let end = to.map(|s| parse_date_input(s)).transpose()?;
        let start = start.or(end).unwrap_or(today);
        let end = end.unwrap_or(today);
        return Ok(PeriodPreset::Custom { start, end }.resolve(today));
    }
    let preset = match sub.get_one::<String>("period") {
        Some(p) => p.parse::<PeriodPreset>()?,
        None => PeriodPreset::Month(MonthKey::of(today)),
    };
    Ok(preset.resolve(today))
}

pub fn resolve_view(sub: &clap::ArgMatches, config: &Config) -> Result<ViewMode> {
    match sub.get_one::<String>("view") {
        Some(v) => Ok(v.parse()?),
        None => Ok(config.view),
    }
}
