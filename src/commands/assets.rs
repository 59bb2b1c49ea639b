// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, Collection};
use crate::models::InvestmentAsset;
use crate::utils::{maybe_print_json, new_id, parse_amount, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let asset = InvestmentAsset {
                id: sub
                    .get_one::<String>("id")
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(new_id),
                name: required(sub.get_one::<String>("name"), "name")?.to_string(),
                country: required(sub.get_one::<String>("country"), "country")?.parse()?,
                current_value: parse_amount(required(sub.get_one::<String>("value"), "value")?)?,
                kind: sub.get_one::<String>("kind").cloned(),
            };
            db::save(conn, Collection::Assets, &asset.id, &asset)?;
            println!(
                "Added asset '{}' worth {:.2} {}",
                asset.name,
                asset.current_value,
                asset.country.currency()
            );
        }
        Some(("list", sub)) => {
            let assets: Vec<InvestmentAsset> = db::load(conn, Collection::Assets)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &assets)? {
                let data = assets
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.clone(),
                            a.name.clone(),
                            a.kind.clone().unwrap_or_default(),
                            a.country.to_string(),
                            format!("{:.2} {}", a.current_value, a.country.currency()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Kind", "Country", "Value"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub.get_one::<String>("id"), "id")?;
            if db::delete(conn, Collection::Assets, id)? {
                println!("Removed asset '{}'", id);
            } else {
                println!("No asset '{}'", id);
            }
        }
        _ => {}
    }
    Ok(())
}
