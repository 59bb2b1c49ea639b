// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::models::{Country, Origin, TxStatus, TxType};
use homeledger::normalize::{
    RawBudget, RawTransaction, coerce_amount, max_amount, normalize_budget, normalize_transaction,
    normalize_transactions, parse_decimal_text,
};
use rust_decimal::Decimal;
use serde_json::json;

fn raw(v: serde_json::Value) -> RawTransaction {
    serde_json::from_value(v).unwrap()
}

#[test]
fn decimal_text_shapes() {
    assert_eq!(parse_decimal_text("1234.5"), Some(Decimal::new(12345, 1)));
    assert_eq!(parse_decimal_text("1.234,56"), Some(Decimal::new(123456, 2)));
    assert_eq!(parse_decimal_text("1,234.56"), Some(Decimal::new(123456, 2)));
    assert_eq!(parse_decimal_text("R$ 10,00"), Some(Decimal::new(10, 0)));
    assert_eq!(parse_decimal_text("1.000.000"), Some(Decimal::new(1_000_000, 0)));
    assert_eq!(parse_decimal_text("abc"), None);
}

#[test]
fn amounts_coerce_to_zero_when_unreadable() {
    assert_eq!(coerce_amount(&json!(12.5)), Decimal::new(125, 1));
    assert_eq!(coerce_amount(&json!("7,25")), Decimal::new(725, 2));
    assert_eq!(coerce_amount(&json!(null)), Decimal::ZERO);
    assert_eq!(coerce_amount(&json!({"v": 1})), Decimal::ZERO);
    assert_eq!(coerce_amount(&json!("n/a")), Decimal::ZERO);
}

#[test]
fn loosely_typed_document_normalizes() {
    let t = normalize_transaction(raw(json!({
        "id": "abc",
        "tipo": "despesa",
        "pais": "Brasil",
        "categoryId": "food",
        "accountItemId": "groceries",
        "valor": "-1.234,56",
        "dueDate": "05/03/2025",
        "competencyDate": "2025-02",
        "status": "pago",
        "origin": "IMPORTED"
    })))
    .unwrap();
    assert_eq!(t.id, "abc");
    assert_eq!(t.r#type, TxType::Expense);
    assert_eq!(t.country, Country::Brazil);
    assert_eq!(t.amount, Decimal::new(123456, 2));
    assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
    assert_eq!(t.competency_date, NaiveDate::from_ymd_opt(2025, 2, 1));
    assert_eq!(t.resolved_date(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    assert_eq!(t.status, TxStatus::Paid);
    assert_eq!(t.origin, Origin::Imported);
}

#[test]
fn defaults_fill_missing_fields() {
    let t = normalize_transaction(raw(json!({
        "type": "INCOME",
        "country": "PT",
        "date": "2025-01-31",
        "status": "whatever"
    })))
    .unwrap();
    assert!(!t.id.is_empty());
    assert_eq!(t.amount, Decimal::ZERO);
    assert_eq!(t.status, TxStatus::Pending);
    assert_eq!(t.origin, Origin::Manual);
    assert_eq!(t.category_id, "");
}

#[test]
fn competency_stands_in_for_missing_payment_date() {
    let t = normalize_transaction(raw(json!({
        "type": "EXPENSE",
        "country": "PT",
        "competency_date": "2025-04-15",
        "amount": 3
    })))
    .unwrap();
    assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
}

#[test]
fn unusable_records_are_dropped() {
    let rows = vec![
        raw(json!({"type": "GIFT", "country": "PT", "date": "2025-01-01"})),
        raw(json!({"type": "EXPENSE", "country": "US", "date": "2025-01-01"})),
        raw(json!({"type": "EXPENSE", "country": "PT", "date": "someday"})),
        raw(json!({"type": "EXPENSE", "country": "PT", "date": "2025-01-01", "amount": 9})),
    ];
    let kept = normalize_transactions(rows);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].amount, Decimal::new(9, 0));
}

#[test]
fn budgets_accept_month_keys_and_split_fields() {
    let split: RawBudget = serde_json::from_value(json!({
        "categoryId": "food", "year": "2025", "month": 3, "country": "PT", "amount": "150"
    }))
    .unwrap();
    let b = normalize_budget(split).unwrap();
    assert_eq!((b.year, b.month), (2025, 3));
    assert_eq!(b.amount, Decimal::new(150, 0));

    let keyed: RawBudget = serde_json::from_value(json!({
        "category_id": "food", "month": "2025-11", "country": "BR", "amount": 80
    }))
    .unwrap();
    let b = normalize_budget(keyed).unwrap();
    assert_eq!((b.year, b.month, b.country), (2025, 11, Country::Brazil));

    let bad: RawBudget = serde_json::from_value(json!({
        "category_id": "food", "year": 2025, "month": 13, "country": "PT", "amount": 1
    }))
    .unwrap();
    assert!(normalize_budget(bad).is_none());
}

#[test]
fn amounts_beyond_the_cap_are_dropped() {
    let at_cap = normalize_transaction(raw(json!({
        "type": "EXPENSE", "country": "PT", "date": "2025-01-01",
        "amount": max_amount().to_string()
    })));
    assert_eq!(at_cap.unwrap().amount, max_amount());

    let over = raw(json!({
        "type": "EXPENSE", "country": "PT", "date": "2025-01-01",
        "amount": "-79228162514264337593543950335"
    }));
    assert!(normalize_transaction(over).is_none());

    let budget: RawBudget = serde_json::from_value(json!({
        "category_id": "food", "month": "2025-11", "country": "BR",
        "amount": "79228162514264337593543950335"
    }))
    .unwrap();
    assert!(normalize_budget(budget).is_none());
}
