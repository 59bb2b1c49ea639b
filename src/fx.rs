// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ValidationError;
use crate::models::Country;
use crate::normalize::coerce_amount;
use crate::utils::{http_client, set_setting};

pub const QUOTE_URL: &str = "https://economia.awesomeapi.com.br/last/EUR-BRL";

/// Rate used when no quote was ever fetched or configured.
pub fn fallback_eur_brl() -> Decimal {
    Decimal::new(615, 2)
}

/// Which slice of the household the aggregates look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewMode {
    Country(Country),
    /// Both countries merged, every amount converted into `display`'s currency.
    Consolidated { display: Country },
}

impl ViewMode {
    pub fn includes(&self, country: Country) -> bool {
        match self {
            ViewMode::Country(c) => *c == country,
            ViewMode::Consolidated { .. } => true,
        }
    }

    pub fn display_country(&self) -> Country {
        match self {
            ViewMode::Country(c) => *c,
            ViewMode::Consolidated { display } => *display,
        }
    }

    pub fn currency(&self) -> &'static str {
        self.display_country().currency()
    }
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Consolidated {
            display: Country::Brazil,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Country(c) => write!(f, "{}", c),
            ViewMode::Consolidated {
                display: Country::Brazil,
            } => f.write_str("ALL"),
            ViewMode::Consolidated { display } => write!(f, "ALL:{}", display),
        }
    }
}

impl FromStr for ViewMode {
    type Err = ValidationError;

    /// `PT`, `BR`, `ALL` (shown in BRL) or `ALL:PT` / `ALL:BR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_uppercase();
        if let Some(rest) = t.strip_prefix("ALL:") {
            return Ok(ViewMode::Consolidated {
                display: rest.parse()?,
            });
        }
        match t.as_str() {
            "ALL" | "GLOBAL" | "CONSOLIDATED" => Ok(ViewMode::default()),
            other => other.parse().map(ViewMode::Country).map_err(|_| {
                ValidationError::UnknownValue {
                    field: "view",
                    value: s.trim().to_string(),
                }
            }),
        }
    }
}

/// Value of one unit of each country's currency in a shared pivot unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateTable {
    quotes: BTreeMap<Country, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `rate` BRL buy one EUR.
    pub fn eur_brl(rate: Decimal) -> Self {
        Self::new()
            .with_quote(Country::Portugal, rate)
            .with_quote(Country::Brazil, Decimal::ONE)
    }

    pub fn with_quote(mut self, country: Country, quote: Decimal) -> Self {
        self.quotes.insert(country, quote);
        self
    }

    pub fn quote(&self, country: Country) -> Option<Decimal> {
        self.quotes
            .get(&country)
            .copied()
            .filter(|q| q.is_sign_positive() && !q.is_zero())
    }

    pub fn convert_between(&self, amount: Decimal, from: Country, to: Country) -> Option<Decimal> {
        if from == to {
            return Some(amount);
        }
        let f = self.quote(from)?;
        let t = self.quote(to)?;
        amount.checked_mul(f)?.checked_div(t)
    }
}

/// Express `amount` (in `source`'s currency) in the view's currency.
///
/// Single-country views are identity. A missing quote leaves the amount
/// unconverted.
pub fn convert(amount: Decimal, source: Country, view: ViewMode, rates: &RateTable) -> Decimal {
    match view {
        ViewMode::Country(_) => amount,
        ViewMode::Consolidated { display: target } => rates
            .convert_between(amount, source, target)
            .unwrap_or_else(|| {
                debug!(%source, %target, "no usable rate; amount left unconverted");
                amount
            }),
    }
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(rename = "EURBRL")]
    eur_brl: Quote,
}

#[derive(Debug, Deserialize)]
struct Quote {
    bid: serde_json::Value,
}

pub fn parse_quote_body(body: &str) -> Result<Decimal> {
    let parsed: QuoteBody = serde_json::from_str(body).context("Unexpected quote payload")?;
    let bid = coerce_amount(&parsed.eur_brl.bid);
    if bid <= Decimal::ZERO {
        return Err(anyhow!("Non-positive EUR/BRL bid {}", bid));
    }
    Ok(bid)
}

pub fn fetch_eur_brl(client: &reqwest::blocking::Client) -> Result<Decimal> {
    let resp = client.get(QUOTE_URL).send()?.error_for_status()?;
    let body = resp.text()?;
    parse_quote_body(&body)
}

/// Last fetched rate, else the configured fallback, else [`fallback_eur_brl`].
pub fn stored_rate(conn: &Connection) -> Result<Decimal> {
    Ok(Config::load(conn)?.rate())
}

/// One best-effort fetch. Failures keep the stored or fallback rate.
pub fn current_rate(conn: &Connection, fetch: bool) -> Result<Decimal> {
    if fetch {
        match http_client().and_then(|c| fetch_eur_brl(&c)) {
            Ok(rate) => {
                set_setting(conn, "last_rate", &rate.to_string())?;
                info!(%rate, "EUR/BRL quote fetched");
                return Ok(rate);
            }
            Err(e) => warn!(error = %e, "EUR/BRL quote fetch failed; keeping previous rate"),
        }
    }
    stored_rate(conn)
}
