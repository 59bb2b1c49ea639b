// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::fx::{RateTable, ViewMode, convert};
use crate::models::{Transaction, TxType};
use crate::period::{MAX_MONTH_SPAN, MonthKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionMonth {
    pub month: MonthKey,
    pub inflows: Decimal,
    pub outflows: Decimal,
    pub net: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashProjection {
    pub currency: String,
    pub starting_balance: Decimal,
    pub months: Vec<ProjectionMonth>,
}

impl CashProjection {
    pub fn ending_balance(&self) -> Decimal {
        self.months
            .last()
            .map(|m| m.running_balance)
            .unwrap_or(self.starting_balance)
    }
}

/// Signed cash effect: income adds, expenses and invoice payments subtract,
/// transfers are neutral.
fn signed(kind: TxType, amount: Decimal) -> Decimal {
    if kind.is_inflow() {
        amount
    } else if kind.is_outflow() {
        -amount
    } else {
        Decimal::ZERO
    }
}

/// Roll the balance forward `months` months from `start`.
///
/// Months are taken from the resolved date (competency first). Paid
/// transactions before `start` seed the balance. Unpaid ones are placed in
/// their month, with anything overdue pulled into `start`. Paid transactions
/// from `start` on are already reflected and are skipped.
pub fn project(
    transactions: &[Transaction],
    view: ViewMode,
    rates: &RateTable,
    start: MonthKey,
    months: usize,
) -> CashProjection {
    let months = months.min(MAX_MONTH_SPAN);
    let end = start.offset(months as i32 - 1);

    let mut starting_balance = Decimal::ZERO;
    let mut buckets: BTreeMap<MonthKey, (Decimal, Decimal)> = BTreeMap::new();

    for t in transactions.iter().filter(|t| view.includes(t.country)) {
        let month = MonthKey::of(t.resolved_date());
        let amount = convert(t.amount, t.country, view, rates);
        if t.is_paid() {
            if month < start {
                starting_balance = starting_balance.saturating_add(signed(t.r#type, amount));
            }
            continue;
        }
        let bucket = month.max(start);
        if months == 0 || bucket > end {
            continue;
        }
        let entry = buckets
            .entry(bucket)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if t.r#type.is_inflow() {
            entry.0 = entry.0.saturating_add(amount);
        } else if t.r#type.is_outflow() {
            entry.1 = entry.1.saturating_add(amount);
        }
    }

    let mut running = starting_balance;
    let rows: Vec<ProjectionMonth> = (0..months)
        .map(|i| {
            let month = start.offset(i as i32);
            let (inflows, outflows) = buckets
                .get(&month)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            let net = inflows.saturating_sub(outflows);
            running = running.saturating_add(net);
            ProjectionMonth {
                month,
                inflows,
                outflows,
                net,
                running_balance: running,
            }
        })
        .collect();

    debug!(%start, months, %starting_balance, "cash projection computed");
    CashProjection {
        currency: view.currency().to_string(),
        starting_balance,
        months: rows,
    }
}
