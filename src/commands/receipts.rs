// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::today;
use crate::db::{self, Collection};
use crate::models::Receipt;
use crate::period::parse_date_input;
use crate::utils::{maybe_print_json, new_id, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let receipt = Receipt {
                id: new_id(),
                transaction_id: required(sub.get_one::<String>("tx"), "tx")?.to_string(),
                file_name: required(sub.get_one::<String>("file"), "file")?.to_string(),
                uploaded_on: sub
                    .get_one::<String>("date")
                    .map(|d| parse_date_input(d))
                    .transpose()?
                    .unwrap_or_else(today),
                url: sub.get_one::<String>("url").cloned(),
            };
            db::save(conn, Collection::Receipts, &receipt.id, &receipt)?;
            println!(
                "Attached '{}' to transaction {}",
                receipt.file_name, receipt.transaction_id
            );
        }
        Some(("list", sub)) => {
            let tx = sub.get_one::<String>("tx");
            let receipts: Vec<Receipt> = db::load::<Receipt>(conn, Collection::Receipts)?
                .into_iter()
                .filter(|r| tx.is_none_or(|t| &r.transaction_id == t))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &receipts)? {
                let data = receipts
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.clone(),
                            r.transaction_id.clone(),
                            r.file_name.clone(),
                            r.uploaded_on.to_string(),
                            r.url.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Transaction", "File", "Uploaded", "URL"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub.get_one::<String>("id"), "id")?;
            if db::delete(conn, Collection::Receipts, id)? {
                println!("Removed receipt '{}'", id);
            } else {
                println!("No receipt '{}'", id);
            }
        }
        _ => {}
    }
    Ok(())
}
