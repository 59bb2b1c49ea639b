// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, Config};
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let c = Config::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &c)? {
                let data = vec![
                    vec!["view".into(), c.view.to_string()],
                    vec!["projection_months".into(), c.projection_months.to_string()],
                    vec!["fallback_rate".into(), c.fallback_rate.to_string()],
                    vec![
                        "last_rate".into(),
                        c.last_rate.map(|r| r.to_string()).unwrap_or_else(|| "-".into()),
                    ],
                ];
                println!("{}", pretty_table(&["Key", "Value"], data));
            }
        }
        Some(("set", sub)) => {
            let key = required(sub.get_one::<String>("key"), "key")?;
            let value = required(sub.get_one::<String>("value"), "value")?;
            config::set(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
