// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, Collection};
use crate::index::CategoryIndex;
use crate::models::{AccountItem, Category, Country, FlowType};
use crate::utils::{maybe_print_json, new_id, pretty_table, required};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub.get_one::<String>("name"), "name")?;
            let flow: FlowType = required(sub.get_one::<String>("flow"), "flow")?.parse()?;
            let id = sub
                .get_one::<String>("id")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(new_id);
            let cat = Category {
                id: id.clone(),
                name: name.to_string(),
                flow,
                items: Vec::new(),
            };
            db::save(conn, Collection::Categories, &id, &cat)?;
            println!("Added category '{}' ({})", name, id);
        }
        Some(("list", sub)) => {
            let cats: Vec<Category> = db::load(conn, Collection::Categories)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let mut data = Vec::new();
                for c in &cats {
                    let items: Vec<String> = c
                        .items
                        .iter()
                        .map(|i| format!("{} ({})", i.name, i.country))
                        .collect();
                    data.push(vec![
                        c.id.clone(),
                        c.name.clone(),
                        c.flow.as_str().to_string(),
                        items.join(", "),
                    ]);
                }
                println!("{}", pretty_table(&["Id", "Category", "Flow", "Items"], data));
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub.get_one::<String>("id"), "id")?;
            if db::delete(conn, Collection::Categories, id)? {
                println!("Removed category '{}'", id);
            } else {
                println!("No category '{}'", id);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Look a category up by id or name among the stored ones.
pub fn find_category(conn: &Connection, key: &str) -> Result<Category> {
    let cats: Vec<Category> = db::load(conn, Collection::Categories)?;
    CategoryIndex::build(&cats)
        .find(key)
        .cloned()
        .ok_or_else(|| anyhow!("Category '{}' not found", key))
}

pub fn handle_items(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let category = required(sub.get_one::<String>("category"), "category")?;
            let mut cat = find_category(conn, category)?;
            let name = required(sub.get_one::<String>("name"), "name")?;
            let country: Country = required(sub.get_one::<String>("country"), "country")?.parse()?;
            let id = sub
                .get_one::<String>("id")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(new_id);
            cat.items.retain(|i| i.id != id);
            cat.items.push(AccountItem {
                id: id.clone(),
                name: name.to_string(),
                country,
                default_supplier: sub.get_one::<String>("supplier").cloned(),
                default_note: sub.get_one::<String>("note").cloned(),
            });
            db::save(conn, Collection::Categories, &cat.id, &cat)?;
            println!("Added item '{}' ({}) to {}", name, id, cat.name);
        }
        Some(("rm", sub)) => {
            let category = required(sub.get_one::<String>("category"), "category")?;
            let mut cat = find_category(conn, category)?;
            let id = required(sub.get_one::<String>("id"), "id")?;
            let before = cat.items.len();
            cat.items.retain(|i| i.id != id);
            if cat.items.len() == before {
                println!("No item '{}' in {}", id, cat.name);
            } else {
                db::save(conn, Collection::Categories, &cat.id, &cat)?;
                println!("Removed item '{}' from {}", id, cat.name);
            }
        }
        _ => {}
    }
    Ok(())
}
