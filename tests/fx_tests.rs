// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homeledger::config::{self, Config};
use homeledger::db;
use homeledger::fx::{
    RateTable, ViewMode, convert, current_rate, fallback_eur_brl, parse_quote_body,
};
use homeledger::models::Country;
use homeledger::utils::set_setting;
use rust_decimal::Decimal;

#[test]
fn consolidated_brl_multiplies_eur_amounts() {
    let rates = RateTable::eur_brl(Decimal::new(6, 0));
    let view = ViewMode::Consolidated { display: Country::Brazil };
    assert_eq!(convert(Decimal::new(10, 0), Country::Portugal, view, &rates), Decimal::new(60, 0));
    assert_eq!(convert(Decimal::new(10, 0), Country::Brazil, view, &rates), Decimal::new(10, 0));
}

#[test]
fn country_view_never_converts() {
    let rates = RateTable::eur_brl(Decimal::new(6, 0));
    let amt = Decimal::new(1234, 2);
    assert_eq!(convert(amt, Country::Portugal, ViewMode::Country(Country::Brazil), &rates), amt);
    assert_eq!(convert(amt, Country::Brazil, ViewMode::Country(Country::Portugal), &rates), amt);
}

#[test]
fn round_trip_reproduces_amount() {
    let rates = RateTable::eur_brl(Decimal::new(615, 2));
    let amt = Decimal::new(98765, 2);
    let brl = rates.convert_between(amt, Country::Portugal, Country::Brazil).unwrap();
    let back = rates.convert_between(brl, Country::Brazil, Country::Portugal).unwrap();
    assert_eq!(back.round_dp(8), amt);
}

#[test]
fn missing_quote_leaves_amount_unconverted() {
    let rates = RateTable::new().with_quote(Country::Brazil, Decimal::ONE);
    let view = ViewMode::Consolidated { display: Country::Brazil };
    let amt = Decimal::new(10, 0);
    assert_eq!(convert(amt, Country::Portugal, view, &rates), amt);

    let zero = RateTable::eur_brl(Decimal::ZERO);
    assert_eq!(zero.quote(Country::Portugal), None);
    assert_eq!(convert(amt, Country::Portugal, view, &zero), amt);
}

#[test]
fn view_mode_parses_and_displays() {
    assert_eq!("pt".parse::<ViewMode>().unwrap(), ViewMode::Country(Country::Portugal));
    assert_eq!(
        "ALL".parse::<ViewMode>().unwrap(),
        ViewMode::Consolidated { display: Country::Brazil }
    );
    let v: ViewMode = "all:pt".parse().unwrap();
    assert_eq!(v.currency(), "EUR");
    assert_eq!(v.to_string().parse::<ViewMode>().unwrap(), v);
    assert!("XX".parse::<ViewMode>().is_err());
}

#[test]
fn quote_body_accepts_string_and_number_bids() {
    let body = r#"{"EURBRL":{"code":"EUR","codein":"BRL","bid":"6.1534","ask":"6.16"}}"#;
    assert_eq!(parse_quote_body(body).unwrap(), Decimal::new(61534, 4));
    let numeric = r#"{"EURBRL":{"bid":5.9}}"#;
    assert_eq!(parse_quote_body(numeric).unwrap(), Decimal::new(59, 1));
}

#[test]
fn quote_body_rejects_garbage() {
    assert!(parse_quote_body("not json").is_err());
    assert!(parse_quote_body(r#"{"USDBRL":{"bid":"5"}}"#).is_err());
    assert!(parse_quote_body(r#"{"EURBRL":{"bid":"0"}}"#).is_err());
    assert!(parse_quote_body(r#"{"EURBRL":{"bid":"-1"}}"#).is_err());
}

#[test]
fn rate_falls_back_through_config() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(current_rate(&conn, false).unwrap(), fallback_eur_brl());

    config::set(&conn, "fallback_rate", "5.5").unwrap();
    assert_eq!(current_rate(&conn, false).unwrap(), Decimal::new(55, 1));

    set_setting(&conn, "last_rate", "6.02").unwrap();
    assert_eq!(current_rate(&conn, false).unwrap(), Decimal::new(602, 2));
    assert_eq!(
        Config::load(&conn).unwrap().rates().quote(Country::Portugal),
        Some(Decimal::new(602, 2))
    );
}

#[test]
fn unreadable_stored_rate_is_ignored() {
    let conn = db::open_in_memory().unwrap();
    set_setting(&conn, "last_rate", "abc").unwrap();
    set_setting(&conn, "fallback_rate", "-3").unwrap();
    let c = Config::load(&conn).unwrap();
    assert_eq!(c.last_rate, None);
    assert_eq!(c.rate(), fallback_eur_brl());
}
