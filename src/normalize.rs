// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Converts loosely typed stored or imported records into the typed model.
//!
//! Everything past this module may assume well-formed data.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Budget, Origin, Recurrence, Transaction, TxStatus, TxType};
use crate::period::{MonthKey, parse_flexible_date};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTransaction {
    pub id: Option<String>,
    #[serde(rename = "type", alias = "tipo")]
    pub kind: Option<String>,
    #[serde(alias = "pais")]
    pub country: Option<String>,
    #[serde(alias = "categoryId")]
    pub category_id: Option<String>,
    #[serde(alias = "accountItemId", alias = "item_id")]
    pub account_item_id: Option<String>,
    #[serde(alias = "paymentMethodId")]
    pub payment_method_id: Option<String>,
    #[serde(alias = "valor")]
    pub amount: Value,
    pub date: Option<String>,
    #[serde(alias = "dueDate")]
    pub due_date: Option<String>,
    #[serde(alias = "paymentDate")]
    pub payment_date: Option<String>,
    #[serde(alias = "competencyDate")]
    pub competency_date: Option<String>,
    pub description: Option<String>,
    pub note: Option<String>,
    pub supplier: Option<String>,
    pub status: Option<String>,
    pub origin: Option<String>,
    pub recurrence: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBudget {
    pub id: Option<String>,
    #[serde(alias = "categoryId")]
    pub category_id: Option<String>,
    #[serde(alias = "accountItemId")]
    pub account_item_id: Option<String>,
    pub year: Value,
    pub month: Value,
    pub country: Option<String>,
    pub amount: Value,
}

/// Largest amount a single record may carry. Anything above is treated as corrupt.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000_000, 0)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse human-entered amounts: `1234.5`, `1.234,56`, `1,234.56`, `R$ 10,00`.
pub fn parse_decimal_text(raw: &str) -> Option<Decimal> {
    let mut s: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');
    match (last_comma, last_dot) {
        (Some(c), Some(d)) if c > d => {
            s = s.replace('.', "").replace(',', ".");
        }
        (Some(_), Some(_)) => {
            s = s.replace(',', "");
        }
        (Some(c), None) => {
            let decimals = s.len() - c - 1;
            if s.matches(',').count() == 1 && decimals <= 2 {
                s = s.replace(',', ".");
            } else {
                s = s.replace(',', "");
            }
        }
        (None, Some(_)) if s.matches('.').count() > 1 => {
            s = s.replace('.', "");
        }
        _ => {}
    }
    s.parse::<Decimal>().ok()
}

/// Missing or unreadable amounts become zero.
pub fn coerce_amount(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => {
            let text = n.to_string();
            text.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(&text))
                .unwrap_or(Decimal::ZERO)
        }
        Value::String(s) => parse_decimal_text(s).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn coerce_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_origin(raw: Option<&str>) -> Origin {
    match raw.map(|s| s.trim().to_uppercase()).as_deref() {
        Some("IMPORTED") | Some("IMPORTADO") => Origin::Imported,
        _ => Origin::Manual,
    }
}

/// Returns `None` when type, country or every date field is unusable.
pub fn normalize_transaction(raw: RawTransaction) -> Option<Transaction> {
    let id = non_empty(raw.id).unwrap_or_else(|| Uuid::new_v4().to_string());
    let Some(kind) = raw.kind.as_deref().and_then(|k| k.parse::<TxType>().ok()) else {
        debug!(%id, kind = ?raw.kind, "dropping transaction with unknown type");
        return None;
    };
    let Some(country) = raw.country.as_deref().and_then(|c| c.parse().ok()) else {
        debug!(%id, country = ?raw.country, "dropping transaction with unknown country");
        return None;
    };
    let payment = [&raw.date, &raw.due_date, &raw.payment_date]
        .into_iter()
        .flatten()
        .find_map(|d| parse_flexible_date(d));
    let competency = raw.competency_date.as_deref().and_then(parse_flexible_date);
    let Some(date) = payment.or(competency) else {
        debug!(%id, "dropping transaction without a parseable date");
        return None;
    };
    let status = raw
        .status
        .as_deref()
        .and_then(|s| s.parse::<TxStatus>().ok())
        .unwrap_or(TxStatus::Pending);
    let recurrence = raw
        .recurrence
        .and_then(|v| serde_json::from_value::<Recurrence>(v).ok());
    let amount = coerce_amount(&raw.amount).abs();
    if amount > max_amount() {
        debug!(%id, %amount, "dropping transaction with out-of-range amount");
        return None;
    }

    Some(Transaction {
        id,
        r#type: kind,
        country,
        category_id: non_empty(raw.category_id).unwrap_or_default(),
        account_item_id: non_empty(raw.account_item_id).unwrap_or_default(),
        payment_method_id: non_empty(raw.payment_method_id),
        amount,
        date,
        competency_date: competency,
        description: raw.description.unwrap_or_default().trim().to_string(),
        note: non_empty(raw.note),
        supplier: non_empty(raw.supplier),
        status,
        origin: parse_origin(raw.origin.as_deref()),
        recurrence,
    })
}

pub fn normalize_transactions<I>(raws: I) -> Vec<Transaction>
where
    I: IntoIterator<Item = RawTransaction>,
{
    let mut dropped = 0usize;
    let out: Vec<Transaction> = raws
        .into_iter()
        .filter_map(|r| {
            let t = normalize_transaction(r);
            if t.is_none() {
                dropped += 1;
            }
            t
        })
        .collect();
    if dropped > 0 {
        debug!(dropped, kept = out.len(), "transactions normalized");
    }
    out
}

pub fn normalize_budget(raw: RawBudget) -> Option<Budget> {
    let category_id = non_empty(raw.category_id)?;
    let country = raw.country.as_deref().and_then(|c| c.parse().ok())?;
    let month = match raw.month.as_str().and_then(|s| s.parse::<MonthKey>().ok()) {
        Some(k) => k,
        None => {
            let y = coerce_int(&raw.year)?;
            let m = coerce_int(&raw.month)?;
            MonthKey::new(i32::try_from(y).ok()?, u32::try_from(m).ok()?)?
        }
    };
    let amount = coerce_amount(&raw.amount).abs();
    if amount > max_amount() {
        return None;
    }
    Some(Budget {
        id: non_empty(raw.id).unwrap_or_else(|| Uuid::new_v4().to_string()),
        category_id,
        account_item_id: non_empty(raw.account_item_id),
        year: month.year(),
        month: month.month(),
        country,
        amount,
    })
}

pub fn normalize_budgets<I>(raws: I) -> Vec<Budget>
where
    I: IntoIterator<Item = RawBudget>,
{
    raws.into_iter()
        .filter_map(|r| {
            let id = r.id.clone();
            let b = normalize_budget(r);
            if b.is_none() {
                debug!(?id, "dropping malformed budget row");
            }
            b
        })
        .collect()
}
