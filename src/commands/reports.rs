// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{Aggregator, DeviationRow, net_worth};
use crate::commands::{resolve_period, resolve_view, today};
use crate::config::Config;
use crate::db::Snapshot;
use crate::index::CategoryIndex;
use crate::period::MonthKey;
use crate::projection::project;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table, required};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        Some(("drill", sub)) => drill(conn, sub)?,
        Some(("projection", sub)) => projection(conn, sub)?,
        Some(("networth", sub)) => networth(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn deviation_table(rows: &[DeviationRow], ccy: &str) -> comfy_table::Table {
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.category.clone(),
                fmt_money(&r.actual, ccy),
                fmt_money(&r.budget, ccy),
                fmt_money(&r.trend, ccy),
                fmt_money(&r.diff, ccy),
                fmt_pct(r.pct),
            ]
        })
        .collect();
    pretty_table(
        &["Category", "Actual", "Budget", "Trend (3m avg)", "Diff", "Diff %"],
        data,
    )
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let snap = Snapshot::load(conn)?;
    let config = Config::load(conn)?;
    let period = resolve_period(sub, today())?;
    let view = resolve_view(sub, &config)?;
    let top = *sub.get_one::<usize>("top").unwrap_or(&5);
    let rates = config.rates();
    let index = CategoryIndex::build(&snap.categories);

    let report = Aggregator::new(&snap.transactions, &snap.budgets, &index, period, view, &rates)
        .report(top);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = report.currency.as_str();
    println!("Dashboard {} [{}]", report.period, report.view);
    println!("{}", deviation_table(&report.rows, ccy));
    println!(
        "Spent {} of {} budgeted; income {}",
        fmt_money(&report.total_actual, ccy),
        fmt_money(&report.total_budget, ccy),
        fmt_money(&report.total_income, ccy)
    );
    if !report.top_by_value.is_empty() {
        println!("Largest deviations");
        println!("{}", deviation_table(&report.top_by_value, ccy));
    }
    if !report.top_by_percentage.is_empty() {
        println!("Largest deviations (%)");
        println!("{}", deviation_table(&report.top_by_percentage, ccy));
    }
    Ok(())
}

fn drill(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let snap = Snapshot::load(conn)?;
    let config = Config::load(conn)?;
    let period = resolve_period(sub, today())?;
    let view = resolve_view(sub, &config)?;
    let rates = config.rates();
    let index = CategoryIndex::build(&snap.categories);

    let key = required(sub.get_one::<String>("category"), "category")?;
    // Unknown names still drill by raw id so orphaned transactions stay reachable.
    let category_id = index.find(key).map(|c| c.id.clone()).unwrap_or_else(|| key.to_string());
    let items = Aggregator::new(&snap.transactions, &snap.budgets, &index, period, view, &rates)
        .drill_down(&category_id);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    let ccy = view.currency();
    let data = items
        .iter()
        .map(|i| vec![i.name.clone(), fmt_money(&i.amount, ccy)])
        .collect();
    println!(
        "{} in {} [{}]",
        index.category_name(&category_id),
        period,
        view
    );
    println!("{}", pretty_table(&["Item", "Actual"], data));
    Ok(())
}

fn projection(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let snap = Snapshot::load(conn)?;
    let config = Config::load(conn)?;
    let view = resolve_view(sub, &config)?;
    let start = match sub.get_one::<String>("start") {
        Some(s) => s.parse::<MonthKey>()?,
        None => MonthKey::of(today()),
    };
    let months = sub
        .get_one::<usize>("months")
        .copied()
        .unwrap_or(config.projection_months);
    if months == 0 {
        return Err(anyhow!("--months must be at least 1"));
    }

    let proj = project(&snap.transactions, view, &config.rates(), start, months);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &proj)? {
        return Ok(());
    }
    let ccy = proj.currency.as_str();
    let data = proj
        .months
        .iter()
        .map(|m| {
            vec![
                m.month.to_string(),
                fmt_money(&m.inflows, ccy),
                fmt_money(&m.outflows, ccy),
                fmt_money(&m.net, ccy),
                fmt_money(&m.running_balance, ccy),
            ]
        })
        .collect();
    println!("Opening balance {}", fmt_money(&proj.starting_balance, ccy));
    println!(
        "{}",
        pretty_table(&["Month", "Inflows", "Outflows", "Net", "Balance"], data)
    );
    Ok(())
}

fn networth(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let snap = Snapshot::load(conn)?;
    let config = Config::load(conn)?;
    let view = resolve_view(sub, &config)?;
    let nw = net_worth(&snap.assets, view, &config.rates());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &nw)? {
        return Ok(());
    }
    let data = nw
        .by_country
        .iter()
        .map(|(c, v)| vec![c.to_string(), fmt_money(v, &nw.currency)])
        .collect();
    println!("{}", pretty_table(&["Country", "Value"], data));
    println!("Total {}", fmt_money(&nw.total, &nw.currency));
    Ok(())
}
