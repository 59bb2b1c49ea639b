// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::calendar::{IcsOptions, escape_text, export_ics, fold_line};
use homeledger::fx::ViewMode;
use homeledger::index::CategoryIndex;
use homeledger::models::{
    Category, Country, FlowType, InssRecord, Origin, Transaction, TxStatus, TxType,
};
use homeledger::period::{MonthKey, Period};
use rust_decimal::Decimal;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tx(id: &str, country: Country, on: NaiveDate, description: &str) -> Transaction {
    Transaction {
        id: id.into(),
        r#type: TxType::Expense,
        country,
        category_id: "tax".into(),
        account_item_id: "inss".into(),
        payment_method_id: None,
        amount: Decimal::new(30360, 2),
        date: on,
        competency_date: None,
        description: description.into(),
        note: None,
        supplier: None,
        status: TxStatus::Pending,
        origin: Origin::Manual,
        recurrence: None,
    }
}

fn inss(id: &str, due: NaiveDate, linked: Option<&str>) -> InssRecord {
    InssRecord {
        id: id.into(),
        competency: "2025-02".into(),
        base_salary: Decimal::new(1518, 0),
        rate: Decimal::new(20, 0),
        amount: Decimal::new(30360, 2),
        due_date: due,
        status: TxStatus::Pending,
        transaction_id: linked.map(String::from),
    }
}

fn opts(view: ViewMode) -> IcsOptions {
    IcsOptions {
        period: Period::for_month(MonthKey::new(2025, 3).unwrap()).unwrap(),
        view,
        stamp: ymd(2025, 3, 1).and_hms_opt(12, 0, 0).unwrap(),
    }
}

fn index() -> CategoryIndex {
    CategoryIndex::build(&[Category {
        id: "tax".into(),
        name: "Taxes".into(),
        flow: FlowType::Expense,
        items: vec![],
    }])
}

#[test]
fn calendar_has_envelope_and_crlf_lines() {
    let txs = vec![tx("t1", Country::Brazil, ymd(2025, 3, 15), "Electricity")];
    let ics = export_ics(&txs, &[], &index(), &opts(ViewMode::default()));
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert!(ics.contains("UID:tx-t1@homeledger\r\n"));
    assert!(ics.contains("DTSTAMP:20250301T120000Z\r\n"));
    assert!(ics.contains("DTSTART;VALUE=DATE:20250315\r\n"));
    assert!(ics.contains("DTEND;VALUE=DATE:20250316\r\n"));
    assert!(ics.contains("SUMMARY:Electricity - 303.60 BRL\r\n"));
    assert!(ics.contains("CATEGORIES:Taxes\r\n"));
    assert!(!ics.replace("\r\n", "").contains('\n'));
}

#[test]
fn linked_inss_is_not_duplicated() {
    let txs = vec![tx("t1", Country::Brazil, ymd(2025, 3, 15), "INSS")];
    let records = vec![
        inss("linked", ymd(2025, 3, 15), Some("t1")),
        inss("loose", ymd(2025, 3, 20), None),
        inss("later", ymd(2025, 4, 15), None),
    ];
    let ics = export_ics(&txs, &records, &index(), &opts(ViewMode::default()));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    assert!(!ics.contains("inss-linked@"));
    assert!(ics.contains("UID:inss-loose@homeledger"));
    assert!(ics.contains("SUMMARY:INSS 2025-02 - 303.60 BRL"));
}

#[test]
fn portugal_view_skips_brazilian_entries() {
    let txs = vec![
        tx("pt", Country::Portugal, ymd(2025, 3, 2), "Rent"),
        tx("br", Country::Brazil, ymd(2025, 3, 3), "Aluguel"),
    ];
    let records = vec![inss("loose", ymd(2025, 3, 20), None)];
    let ics = export_ics(&txs, &records, &index(), &opts(ViewMode::Country(Country::Portugal)));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    assert!(ics.contains("SUMMARY:Rent - 303.60 EUR"));
}

#[test]
fn events_are_ordered_by_date() {
    let txs = vec![
        tx("b", Country::Brazil, ymd(2025, 3, 20), "Second"),
        tx("a", Country::Brazil, ymd(2025, 3, 5), "First"),
    ];
    let ics = export_ics(&txs, &[], &index(), &opts(ViewMode::default()));
    let first = ics.find("UID:tx-a@").unwrap();
    let second = ics.find("UID:tx-b@").unwrap();
    assert!(first < second);
}

#[test]
fn text_is_escaped() {
    assert_eq!(escape_text(r"a\b;c,d"), r"a\\b\;c\,d");
    assert_eq!(escape_text("line1\r\nline2"), r"line1\nline2");

    let txs = vec![tx("t1", Country::Brazil, ymd(2025, 3, 15), "Gas; water, light")];
    let ics = export_ics(&txs, &[], &index(), &opts(ViewMode::default()));
    assert!(ics.contains(r"SUMMARY:Gas\; water\, light - 303.60 BRL"));
}

#[test]
fn long_lines_fold_at_75_octets() {
    let line = format!("DESCRIPTION:{}", "x".repeat(200));
    let folded = fold_line(&line);
    let parts: Vec<&str> = folded.split("\r\n").collect();
    assert!(parts.len() > 1);
    assert_eq!(parts[0].len(), 75);
    for p in &parts[1..] {
        assert!(p.starts_with(' '));
        assert!(p.len() <= 75);
    }
    let unfolded: String = parts.concat().replace(' ', "");
    assert_eq!(unfolded, line);

    // multi-byte characters are never split
    let accented = "é".repeat(100);
    for p in fold_line(&accented).split("\r\n") {
        assert!(p.len() <= 75);
        assert!(p.trim_start().chars().all(|c| c == 'é'));
    }

    assert_eq!(fold_line("SHORT"), "SHORT");
}
