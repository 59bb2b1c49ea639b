// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::aggregate::{Aggregator, deviation, net_worth, top_by_percentage, top_by_value};
use homeledger::fx::{RateTable, ViewMode};
use homeledger::index::CategoryIndex;
use homeledger::models::{
    AccountItem, Budget, Category, Country, FlowType, InvestmentAsset, Origin, Transaction,
    TxStatus, TxType,
};
use homeledger::period::{MonthKey, Period};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(
    id: &str,
    kind: TxType,
    country: Country,
    cat: &str,
    item: &str,
    amount: &str,
    on: &str,
) -> Transaction {
    Transaction {
        id: id.into(),
        r#type: kind,
        country,
        category_id: cat.into(),
        account_item_id: item.into(),
        payment_method_id: None,
        amount: d(amount),
        date: date(on),
        competency_date: None,
        description: String::new(),
        note: None,
        supplier: None,
        status: TxStatus::Paid,
        origin: Origin::Manual,
        recurrence: None,
    }
}

fn budget(cat: &str, year: i32, month: u32, country: Country, amount: &str) -> Budget {
    Budget {
        id: format!("{}-{}-{}", cat, year, month),
        category_id: cat.into(),
        account_item_id: None,
        year,
        month,
        country,
        amount: d(amount),
    }
}

fn categories() -> Vec<Category> {
    vec![
        Category {
            id: "food".into(),
            name: "Food".into(),
            flow: FlowType::Expense,
            items: vec![
                AccountItem {
                    id: "groceries".into(),
                    name: "Groceries".into(),
                    country: Country::Portugal,
                    default_supplier: None,
                    default_note: None,
                },
                AccountItem {
                    id: "dining".into(),
                    name: "Dining out".into(),
                    country: Country::Portugal,
                    default_supplier: None,
                    default_note: None,
                },
            ],
        },
        Category {
            id: "home".into(),
            name: "Home".into(),
            flow: FlowType::Expense,
            items: vec![],
        },
    ]
}

fn march() -> Period {
    Period::for_month(MonthKey::new(2025, 3).unwrap()).unwrap()
}

#[test]
fn food_over_budget_scenario() {
    let txs = vec![tx(
        "t1",
        TxType::Expense,
        Country::Portugal,
        "food",
        "groceries",
        "100",
        "2025-03-10",
    )];
    let budgets = vec![budget("food", 2025, 3, Country::Portugal, "150")];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::eur_brl(d("6"));
    let agg = Aggregator::new(
        &txs,
        &budgets,
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );

    let rows = agg.deviations();
    assert_eq!(rows.len(), 1);
    let food = &rows[0];
    assert_eq!(food.category, "Food");
    assert_eq!(food.actual, d("100"));
    assert_eq!(food.budget, d("150"));
    assert_eq!(food.diff, d("-50"));
    assert_eq!(food.pct.unwrap().round_dp(2), d("-33.33"));
}

#[test]
fn deviation_identities() {
    let (diff, pct) = deviation(d("80"), d("200"));
    assert_eq!(diff, d("-120"));
    assert_eq!(pct, Some(d("-60")));

    let (diff, pct) = deviation(d("42"), Decimal::ZERO);
    assert_eq!(diff, d("42"));
    assert_eq!(pct, None);
}

#[test]
fn only_expenses_count_as_actuals() {
    let txs = vec![
        tx("t1", TxType::Expense, Country::Portugal, "food", "groceries", "30", "2025-03-02"),
        tx("t2", TxType::Income, Country::Portugal, "food", "groceries", "500", "2025-03-03"),
        tx("t3", TxType::Transfer, Country::Portugal, "food", "groceries", "70", "2025-03-04"),
        tx(
            "t4",
            TxType::InvoicePayment,
            Country::Portugal,
            "food",
            "groceries",
            "90",
            "2025-03-05",
        ),
    ];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &txs,
        &[],
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );

    assert_eq!(agg.actual_by_category().get("food"), Some(&d("30")));
    assert_eq!(agg.total_income(), d("500"));
}

#[test]
fn competency_date_drives_the_period() {
    let mut late = tx("t1", TxType::Expense, Country::Portugal, "home", "", "40", "2025-04-05");
    late.competency_date = Some(date("2025-03-31"));
    let txs = vec![late];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &txs,
        &[],
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );
    assert_eq!(agg.actual_by_category().get("home"), Some(&d("40")));
}

#[test]
fn country_view_filters_and_consolidated_converts() {
    let txs = vec![
        tx("pt", TxType::Expense, Country::Portugal, "food", "groceries", "10", "2025-03-10"),
        tx("br", TxType::Expense, Country::Brazil, "food", "groceries", "20", "2025-03-11"),
    ];
    let budgets = vec![
        budget("food", 2025, 3, Country::Portugal, "15"),
        budget("food", 2025, 3, Country::Brazil, "100"),
    ];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::eur_brl(d("6"));

    let br = Aggregator::new(
        &txs,
        &budgets,
        &index,
        march(),
        ViewMode::Country(Country::Brazil),
        &rates,
    );
    assert_eq!(br.actual_by_category().get("food"), Some(&d("20")));
    assert_eq!(br.budget_by_category().get("food"), Some(&d("100")));

    let all = Aggregator::new(
        &txs,
        &budgets,
        &index,
        march(),
        ViewMode::Consolidated { display: Country::Brazil },
        &rates,
    );
    assert_eq!(all.actual_by_category().get("food"), Some(&d("80")));
    assert_eq!(all.budget_by_category().get("food"), Some(&d("190")));
}

#[test]
fn budgets_outside_the_period_are_ignored() {
    let budgets = vec![
        budget("food", 2025, 2, Country::Portugal, "999"),
        budget("food", 2025, 3, Country::Portugal, "150"),
    ];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &[],
        &budgets,
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );
    assert_eq!(agg.budget_by_category().get("food"), Some(&d("150")));
}

#[test]
fn trend_averages_non_zero_months() {
    let txs = vec![
        tx("jan", TxType::Expense, Country::Portugal, "food", "groceries", "60", "2025-01-15"),
        tx("mar", TxType::Expense, Country::Portugal, "food", "groceries", "120", "2025-03-15"),
        // outside the three-month window
        tx("old", TxType::Expense, Country::Portugal, "food", "groceries", "1000", "2024-12-15"),
    ];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &txs,
        &[],
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );
    assert_eq!(agg.trend_by_category().get("food"), Some(&d("90")));
}

#[test]
fn trend_is_zero_without_history() {
    let budgets = vec![budget("home", 2025, 3, Country::Portugal, "500")];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &[],
        &budgets,
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );
    let rows = agg.deviations();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].trend, Decimal::ZERO);
    assert!(agg.trend_by_category().is_empty());
}

#[test]
fn rankings_are_ordered_and_skip_unbudgeted_percentages() {
    let txs = vec![
        tx("a", TxType::Expense, Country::Portugal, "food", "groceries", "300", "2025-03-01"),
        tx("b", TxType::Expense, Country::Portugal, "home", "", "50", "2025-03-01"),
        tx("c", TxType::Expense, Country::Portugal, "misc", "", "500", "2025-03-01"),
    ];
    let budgets = vec![
        budget("food", 2025, 3, Country::Portugal, "200"),
        budget("home", 2025, 3, Country::Portugal, "10"),
    ];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &txs,
        &budgets,
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );
    let rows = agg.deviations();

    let by_value: Vec<String> = top_by_value(&rows, 2).into_iter().map(|r| r.category_id).collect();
    assert_eq!(by_value, vec!["misc", "food"]);

    let by_pct: Vec<String> = top_by_percentage(&rows, 5)
        .into_iter()
        .map(|r| r.category_id)
        .collect();
    assert_eq!(by_pct, vec!["home", "food"]);

    // unknown category falls back to its raw id
    let misc = rows.iter().find(|r| r.category_id == "misc").unwrap();
    assert_eq!(misc.category, "misc");
    assert_eq!(misc.pct, None);
}

#[test]
fn drill_down_splits_by_item() {
    let txs = vec![
        tx("a", TxType::Expense, Country::Portugal, "food", "groceries", "30", "2025-03-01"),
        tx("b", TxType::Expense, Country::Portugal, "food", "dining", "45", "2025-03-02"),
        tx("c", TxType::Expense, Country::Portugal, "food", "groceries", "20", "2025-03-03"),
        tx("d", TxType::Expense, Country::Portugal, "home", "", "999", "2025-03-03"),
    ];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &txs,
        &[],
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );
    let items = agg.drill_down("food");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Groceries");
    assert_eq!(items[0].amount, d("50"));
    assert_eq!(items[1].name, "Dining out");
    assert_eq!(items[1].amount, d("45"));
}

#[test]
fn empty_inputs_give_empty_report() {
    let index = CategoryIndex::build(&[]);
    let rates = RateTable::new();
    let agg = Aggregator::new(&[], &[], &index, march(), ViewMode::default(), &rates);
    let report = agg.report(5);
    assert!(report.rows.is_empty());
    assert!(report.top_by_value.is_empty());
    assert_eq!(report.total_actual, Decimal::ZERO);
    assert_eq!(report.total_budget, Decimal::ZERO);
    assert_eq!(report.total_income, Decimal::ZERO);
    assert!(agg.drill_down("food").is_empty());
}

#[test]
fn same_snapshot_same_report() {
    let txs = vec![
        tx("a", TxType::Expense, Country::Portugal, "food", "groceries", "30.10", "2025-03-01"),
        tx("b", TxType::Expense, Country::Brazil, "home", "", "250.55", "2025-03-09"),
        tx("c", TxType::Income, Country::Brazil, "salary", "", "5000", "2025-03-05"),
    ];
    let budgets = vec![budget("food", 2025, 3, Country::Portugal, "40")];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::eur_brl(d("6.15"));
    let view = ViewMode::Consolidated { display: Country::Portugal };
    let first = Aggregator::new(&txs, &budgets, &index, march(), view, &rates).report(3);
    let second = Aggregator::new(&txs, &budgets, &index, march(), view, &rates).report(3);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn net_worth_converts_into_display_currency() {
    let assets = vec![
        InvestmentAsset {
            id: "a1".into(),
            name: "ETF".into(),
            country: Country::Portugal,
            current_value: d("1000"),
            kind: None,
        },
        InvestmentAsset {
            id: "a2".into(),
            name: "Tesouro".into(),
            country: Country::Brazil,
            current_value: d("3000"),
            kind: Some("bond".into()),
        },
    ];
    let rates = RateTable::eur_brl(d("6"));
    let nw = net_worth(&assets, ViewMode::Consolidated { display: Country::Brazil }, &rates);
    assert_eq!(nw.currency, "BRL");
    assert_eq!(nw.total, d("9000"));
    assert_eq!(nw.by_country.get(&Country::Portugal), Some(&d("6000")));

    let pt = net_worth(&assets, ViewMode::Country(Country::Portugal), &rates);
    assert_eq!(pt.total, d("1000"));
}

#[test]
fn extreme_amounts_saturate_instead_of_overflowing() {
    let max = "79228162514264337593543950335";
    let txs = vec![
        tx("a", TxType::Expense, Country::Portugal, "food", "groceries", max, "2025-03-01"),
        tx("b", TxType::Expense, Country::Portugal, "food", "groceries", max, "2025-03-02"),
        tx("c", TxType::Income, Country::Portugal, "", "", max, "2025-03-03"),
        tx("d", TxType::Income, Country::Portugal, "", "", max, "2025-03-04"),
    ];
    let budgets = vec![
        budget("food", 2025, 3, Country::Portugal, max),
        budget("food", 2025, 3, Country::Portugal, max),
    ];
    let cats = categories();
    let index = CategoryIndex::build(&cats);
    let rates = RateTable::new();
    let agg = Aggregator::new(
        &txs,
        &budgets,
        &index,
        march(),
        ViewMode::Country(Country::Portugal),
        &rates,
    );

    let report = agg.report(5);
    assert_eq!(report.total_actual, Decimal::MAX);
    assert_eq!(report.total_income, Decimal::MAX);
    assert_eq!(report.rows[0].actual, Decimal::MAX);
    assert_eq!(report.rows[0].trend, Decimal::MAX);
    assert_eq!(agg.drill_down("food")[0].amount, Decimal::MAX);
}
