// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn period_args() -> [Arg; 3] {
    [
        Arg::new("period")
            .long("period")
            .help("30d, 90d, <n>d, ytd, 12m or YYYY-MM (default: current month)"),
        Arg::new("from")
            .long("from")
            .conflicts_with("period")
            .help("Custom range start"),
        Arg::new("to")
            .long("to")
            .conflicts_with("period")
            .help("Custom range end"),
    ]
}

fn view_arg() -> Arg {
    Arg::new("view")
        .long("view")
        .help("PT, BR, ALL or ALL:PT (default from config)")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

pub fn build_cli() -> Command {
    Command::new("homeledger")
        .about("Two-country household ledger: budgets, dashboards and cash projection")
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log verbosity (-v info, -vv debug)"),
        )
        .arg(
            Arg::new("fetch-rate")
                .long("fetch-rate")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Try once to refresh the EUR/BRL quote before running"),
        )
        .subcommand(Command::new("init").about("Create the local document store"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("flow")
                                .long("flow")
                                .default_value("EXPENSE")
                                .help("EXPENSE or INCOME"),
                        )
                        .arg(Arg::new("id").long("id")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("item")
                .about("Manage account items inside a category")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("country").long("country").required(true))
                        .arg(Arg::new("id").long("id"))
                        .arg(Arg::new("supplier").long("supplier"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("type").long("type").default_value("EXPENSE"))
                        .arg(Arg::new("country").long("country").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("item").long("item").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("competency").long("competency"))
                        .arg(Arg::new("status").long("status").default_value("PENDING"))
                        .arg(Arg::new("method").long("method"))
                        .arg(Arg::new("supplier").long("supplier"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("id").long("id")),
                )
                .subcommand(
                    Command::new("list")
                        .args(period_args())
                        .arg(view_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("pay").arg(id_arg()).arg(Arg::new("date").long("date")))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly goals per category")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(Arg::new("country").long("country").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("item").long("item"))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("month").long("month"))
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("asset")
                .about("Investment positions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("country").long("country").required(true))
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("id").long("id")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("inss")
                .about("Brazilian social-security contributions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("competency").long("competency").required(true))
                        .arg(Arg::new("base").long("base").required(true))
                        .arg(Arg::new("rate").long("rate").required(true))
                        .arg(Arg::new("due").long("due").required(true))
                        .arg(Arg::new("status").long("status").default_value("PENDING"))
                        .arg(Arg::new("tx").long("tx").help("Linked transaction id")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("receipt")
                .about("Receipt attachments")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("tx").long("tx").required(true))
                        .arg(Arg::new("file").long("file").required(true))
                        .arg(Arg::new("url").long("url"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("tx").long("tx"))
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv, json or ics"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .args(period_args())
                    .arg(view_arg()),
            ),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards")
                .subcommand(
                    Command::new("dashboard")
                        .args(period_args())
                        .arg(view_arg())
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("drill")
                        .arg(Arg::new("category").long("category").required(true))
                        .args(period_args())
                        .arg(view_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("projection")
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .help("YYYY-MM (default: current month)"),
                        )
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(view_arg())
                        .args(json_args()),
                )
                .subcommand(Command::new("networth").arg(view_arg()).args(json_args())),
        )
        .subcommand(
            Command::new("fx")
                .about("EUR/BRL rate")
                .subcommand(Command::new("fetch"))
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set").arg(Arg::new("rate").long("rate").required(true)))
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Household settings")
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Report dangling references and dropped records"))
}
