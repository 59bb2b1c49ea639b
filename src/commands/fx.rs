// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::fx::current_rate;
use crate::models::Country;
use crate::utils::{parse_amount, pretty_table, required, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("fetch", _)) => {
            let rate = current_rate(conn, true)?;
            println!("EUR/BRL = {}", rate);
        }
        Some(("show", _)) => {
            let config = Config::load(conn)?;
            let source = if config.last_rate.is_some() {
                "last fetched"
            } else {
                "fallback"
            };
            println!(
                "{}",
                pretty_table(
                    &["Pair", "Rate", "Source"],
                    vec![vec![
                        "EUR/BRL".into(),
                        config.rate().to_string(),
                        source.into()
                    ]]
                )
            );
        }
        Some(("set", sub)) => {
            let rate = parse_amount(required(sub.get_one::<String>("rate"), "rate")?)?;
            set_setting(conn, "last_rate", &rate.to_string())?;
            println!("EUR/BRL set to {}", rate);
        }
        Some(("convert", sub)) => {
            let amount = parse_amount(required(sub.get_one::<String>("amount"), "amount")?)?;
            let from: Country = required(sub.get_one::<String>("from"), "from")?.parse()?;
            let to: Country = required(sub.get_one::<String>("to"), "to")?.parse()?;
            let out = Config::load(conn)?
                .rates()
                .convert_between(amount, from, to)
                .ok_or_else(|| {
                    anyhow!("No rate between {} and {}", from.currency(), to.currency())
                })?;
            println!(
                "{:.2} {} = {:.2} {}",
                amount,
                from.currency(),
                out.round_dp(2),
                to.currency()
            );
        }
        _ => {}
    }
    Ok(())
}
