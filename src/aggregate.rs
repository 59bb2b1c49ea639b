// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget-vs-actual aggregation for the dashboard.
//!
//! All amounts leaving this module are already converted into the view's
//! currency. Nothing here fails on odd data: unknown ids display raw and
//! empty inputs produce empty outputs.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::fx::{RateTable, ViewMode, convert};
use crate::index::CategoryIndex;
use crate::models::{Budget, Country, InvestmentAsset, Transaction, TxType};
use crate::period::{MonthKey, Period};

/// Months looked back (inclusive of the period's last month) for trends.
pub const TREND_MONTHS: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationRow {
    pub category_id: String,
    pub category: String,
    pub actual: Decimal,
    pub budget: Decimal,
    pub trend: Decimal,
    pub diff: Decimal,
    pub pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTotal {
    pub account_item_id: String,
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub period: Period,
    pub view: String,
    pub currency: String,
    pub total_actual: Decimal,
    pub total_budget: Decimal,
    pub total_income: Decimal,
    pub rows: Vec<DeviationRow>,
    pub top_by_value: Vec<DeviationRow>,
    pub top_by_percentage: Vec<DeviationRow>,
}

// Sums saturate at the Decimal bounds instead of panicking.
fn add_to(slot: &mut Decimal, v: Decimal) {
    *slot = slot.saturating_add(v);
}

fn total<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `diff = actual - budget`; `pct` only exists for a positive budget.
pub fn deviation(actual: Decimal, budget: Decimal) -> (Decimal, Option<Decimal>) {
    let diff = actual.saturating_sub(budget);
    let pct = if budget > Decimal::ZERO {
        diff.checked_div(budget)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
    } else {
        None
    };
    (diff, pct)
}

pub struct Aggregator<'a> {
    transactions: &'a [Transaction],
    budgets: &'a [Budget],
    index: &'a CategoryIndex,
    period: Period,
    view: ViewMode,
    rates: &'a RateTable,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        transactions: &'a [Transaction],
        budgets: &'a [Budget],
        index: &'a CategoryIndex,
        period: Period,
        view: ViewMode,
        rates: &'a RateTable,
    ) -> Self {
        Self {
            transactions,
            budgets,
            index,
            period,
            view,
            rates,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    fn converted(&self, amount: Decimal, country: Country) -> Decimal {
        convert(amount, country, self.view, self.rates)
    }

    /// Transactions inside the period and the view's countries.
    pub fn filtered(&self) -> Vec<&'a Transaction> {
        self.transactions
            .iter()
            .filter(|t| self.view.includes(t.country) && self.period.contains(t.resolved_date()))
            .collect()
    }

    fn sum_expenses_by<F>(&self, key: F) -> BTreeMap<String, Decimal>
    where
        F: Fn(&Transaction) -> Option<String>,
    {
        let mut out = BTreeMap::new();
        for t in self.filtered() {
            if t.r#type != TxType::Expense {
                continue;
            }
            if let Some(k) = key(t) {
                let v = self.converted(t.amount, t.country);
                add_to(out.entry(k).or_insert(Decimal::ZERO), v);
            }
        }
        out
    }

    pub fn actual_by_category(&self) -> BTreeMap<String, Decimal> {
        self.sum_expenses_by(|t| Some(t.category_id.clone()))
    }

    pub fn budget_by_category(&self) -> BTreeMap<String, Decimal> {
        let months: BTreeSet<MonthKey> = self.period.months().into_iter().collect();
        let mut out = BTreeMap::new();
        for b in self.budgets {
            if !self.view.includes(b.country) {
                continue;
            }
            let Some(k) = b.month_key() else { continue };
            if !months.contains(&k) {
                continue;
            }
            let v = self.converted(b.amount, b.country);
            add_to(out.entry(b.category_id.clone()).or_insert(Decimal::ZERO), v);
        }
        out
    }

    /// Average of the non-zero monthly totals over the last [`TREND_MONTHS`]
    /// months ending at the period's end month, scaled to the period length.
    ///
    /// Reads the whole history, not only the filtered period.
    pub fn trend_by_category(&self) -> BTreeMap<String, Decimal> {
        let end = self.period.end_month();
        let start = end.offset(1 - TREND_MONTHS);
        let mut monthly: BTreeMap<String, BTreeMap<MonthKey, Decimal>> = BTreeMap::new();
        for t in self.transactions {
            if t.r#type != TxType::Expense || !self.view.includes(t.country) {
                continue;
            }
            let k = MonthKey::of(t.resolved_date());
            if k < start || k > end {
                continue;
            }
            let v = self.converted(t.amount, t.country);
            let slot = monthly
                .entry(t.category_id.clone())
                .or_default()
                .entry(k)
                .or_insert(Decimal::ZERO);
            add_to(slot, v);
        }

        let scale = Decimal::from(self.period.month_count());
        monthly
            .into_iter()
            .map(|(cat, months)| {
                let non_zero: Vec<Decimal> =
                    months.into_values().filter(|v| !v.is_zero()).collect();
                let count = Decimal::from(non_zero.len().max(1));
                let avg = total(non_zero) / count;
                (cat, avg.saturating_mul(scale))
            })
            .collect()
    }

    /// One row per category with any actual, budget or trend figure, ordered by id.
    pub fn deviations(&self) -> Vec<DeviationRow> {
        let actual = self.actual_by_category();
        let budget = self.budget_by_category();
        let trend = self.trend_by_category();
        let ids: BTreeSet<&String> = actual
            .keys()
            .chain(budget.keys())
            .chain(trend.keys())
            .collect();

        ids.into_iter()
            .map(|id| {
                let a = actual.get(id).copied().unwrap_or_default();
                let b = budget.get(id).copied().unwrap_or_default();
                let (diff, pct) = deviation(a, b);
                DeviationRow {
                    category_id: id.clone(),
                    category: self.index.category_name(id).to_string(),
                    actual: a,
                    budget: b,
                    trend: trend.get(id).copied().unwrap_or_default(),
                    diff,
                    pct,
                }
            })
            .collect()
    }

    /// Expense totals for one category, split by account item.
    pub fn drill_down(&self, category_id: &str) -> Vec<ItemTotal> {
        let by_item = self.sum_expenses_by(|t| {
            (t.category_id == category_id).then(|| t.account_item_id.clone())
        });
        let mut items: Vec<ItemTotal> = by_item
            .into_iter()
            .map(|(item, amount)| ItemTotal {
                name: self.index.item_name(category_id, &item).to_string(),
                account_item_id: item,
                amount,
            })
            .collect();
        items.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.account_item_id.cmp(&b.account_item_id))
        });
        items
    }

    pub fn total_income(&self) -> Decimal {
        self.filtered()
            .into_iter()
            .filter(|t| t.r#type == TxType::Income)
            .map(|t| self.converted(t.amount, t.country))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn report(&self, top: usize) -> DashboardReport {
        let rows = self.deviations();
        debug!(period = %self.period, view = %self.view, rows = rows.len(), "dashboard aggregated");
        DashboardReport {
            period: self.period,
            view: self.view.to_string(),
            currency: self.view.currency().to_string(),
            total_actual: total(rows.iter().map(|r| r.actual)),
            total_budget: total(rows.iter().map(|r| r.budget)),
            total_income: self.total_income(),
            top_by_value: top_by_value(&rows, top),
            top_by_percentage: top_by_percentage(&rows, top),
            rows,
        }
    }
}

/// Largest absolute deviations first.
pub fn top_by_value(rows: &[DeviationRow], n: usize) -> Vec<DeviationRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        b.diff
            .abs()
            .cmp(&a.diff.abs())
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    sorted.truncate(n);
    sorted
}

/// Largest absolute percentage deviations first; rows without a budget are left out.
pub fn top_by_percentage(rows: &[DeviationRow], n: usize) -> Vec<DeviationRow> {
    let mut sorted: Vec<DeviationRow> = rows.iter().filter(|r| r.pct.is_some()).cloned().collect();
    sorted.sort_by(|a, b| {
        let pa = a.pct.unwrap_or_default().abs();
        let pb = b.pct.unwrap_or_default().abs();
        pb.cmp(&pa).then_with(|| a.category_id.cmp(&b.category_id))
    });
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorth {
    pub currency: String,
    pub total: Decimal,
    pub by_country: BTreeMap<Country, Decimal>,
}

pub fn net_worth(assets: &[InvestmentAsset], view: ViewMode, rates: &RateTable) -> NetWorth {
    let mut by_country = BTreeMap::new();
    for a in assets.iter().filter(|a| view.includes(a.country)) {
        let v = convert(a.current_value, a.country, view, rates);
        add_to(by_country.entry(a.country).or_insert(Decimal::ZERO), v);
    }
    NetWorth {
        currency: view.currency().to_string(),
        total: total(by_country.values().copied()),
        by_country,
    }
}
