// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Date parsing, month keys and reporting periods.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Upper bound on how many months a range may expand to.
pub const MAX_MONTH_SPAN: usize = 240;

/// Longest `<n>d` lookback accepted from the command line.
pub const MAX_LOOKBACK_DAYS: u32 = MAX_MONTH_SPAN as u32 * 31;

/// Parse the date shapes found in user-entered and imported records.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, `YYYY-MM`, `MM/YYYY` (month forms map to
/// the first day), RFC 3339 timestamps and a couple of naive timestamp forms.
/// Returns `None` rather than guessing; callers exclude such records.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d);
    }
    if let Ok(m) = s.parse::<MonthKey>() {
        return m.first_day();
    }
    if let Some((mm, yyyy)) = s.split_once('/') {
        if yyyy.len() == 4 && !yyyy.contains('/') {
            if let (Ok(y), Ok(m)) = (yyyy.parse::<i32>(), mm.parse::<u32>()) {
                return MonthKey::new(y, m).and_then(|k| k.first_day());
            }
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y/%m/%d").ok()
}

/// Strict variant for user input in commands.
pub fn parse_date_input(raw: &str) -> Result<NaiveDate, ValidationError> {
    parse_flexible_date(raw).ok_or_else(|| ValidationError::InvalidDate(raw.trim().to_string()))
}

/// A calendar month, ordered chronologically and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_index(idx: i64) -> Self {
        Self {
            year: idx.div_euclid(12) as i32,
            month: idx.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn offset(&self, months: i32) -> Self {
        Self::from_index(self.index() + months as i64)
    }

    pub fn succ(&self) -> Self {
        self.offset(1)
    }

    pub fn pred(&self) -> Self {
        self.offset(-1)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: MonthKey) -> i64 {
        other.index() - self.index()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.succ().first_day().map(|d| d - Duration::days(1))
    }

    /// Inclusive range; empty when `start > end`, truncated at [`MAX_MONTH_SPAN`].
    pub fn range(start: MonthKey, end: MonthKey) -> Vec<MonthKey> {
        let mut out = Vec::new();
        let mut cur = start;
        while cur <= end && out.len() < MAX_MONTH_SPAN {
            out.push(cur);
            cur = cur.succ();
        }
        out
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ValidationError::InvalidMonth(s.to_string());
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.is_empty() || m.len() > 2 {
            return Err(invalid());
        }
        let year = y.parse::<i32>().map_err(|_| invalid())?;
        let month = m.parse::<u32>().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn month_key(date: NaiveDate) -> String {
    MonthKey::of(date).to_string()
}

/// `YYYY-MM` keys from `start` to `end` inclusive. Malformed or inverted
/// bounds yield an empty list.
pub fn month_range(start: &str, end: &str) -> Vec<String> {
    match (start.parse::<MonthKey>(), end.parse::<MonthKey>()) {
        (Ok(s), Ok(e)) => MonthKey::range(s, e)
            .into_iter()
            .map(|k| k.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// A closed date interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn for_month(month: MonthKey) -> Option<Self> {
        Some(Self::new(month.first_day()?, month.last_day()?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn start_month(&self) -> MonthKey {
        MonthKey::of(self.start)
    }

    pub fn end_month(&self) -> MonthKey {
        MonthKey::of(self.end)
    }

    pub fn months(&self) -> Vec<MonthKey> {
        MonthKey::range(self.start_month(), self.end_month())
    }

    pub fn month_count(&self) -> usize {
        self.months().len()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodPreset {
    LastDays(u32),
    YearToDate,
    Trailing12Months,
    Month(MonthKey),
    Custom { start: NaiveDate, end: NaiveDate },
}

impl PeriodPreset {
    pub const LAST_30_DAYS: PeriodPreset = PeriodPreset::LastDays(30);
    pub const LAST_90_DAYS: PeriodPreset = PeriodPreset::LastDays(90);

    pub fn resolve(&self, today: NaiveDate) -> Period {
        match *self {
            PeriodPreset::LastDays(n) => {
                let start = today
                    .checked_sub_signed(Duration::days(n as i64))
                    .unwrap_or(NaiveDate::MIN);
                Period::new(start, today)
            }
            PeriodPreset::YearToDate => {
                let jan1 = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                Period::new(jan1, today)
            }
            PeriodPreset::Trailing12Months => {
                let start = MonthKey::of(today)
                    .offset(-11)
                    .first_day()
                    .unwrap_or(today);
                Period::new(start, today)
            }
            PeriodPreset::Month(m) => {
                Period::for_month(m).unwrap_or_else(|| Period::new(today, today))
            }
            PeriodPreset::Custom { start, end } => Period::new(start, end),
        }
    }
}

impl FromStr for PeriodPreset {
    type Err = ValidationError;

    /// `30d`, `90d`, `<n>d`, `ytd`, `12m` or a single `YYYY-MM` month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_lowercase();
        match t.as_str() {
            "ytd" => return Ok(PeriodPreset::YearToDate),
            "12m" | "ttm" => return Ok(PeriodPreset::Trailing12Months),
            _ => {}
        }
        if let Some(n) = t.strip_suffix('d') {
            if let Ok(days) = n.parse::<u32>() {
                if days > MAX_LOOKBACK_DAYS {
                    return Err(ValidationError::OutOfRange {
                        field: "period",
                        value: s.trim().to_string(),
                    });
                }
                return Ok(PeriodPreset::LastDays(days));
            }
        }
        if let Ok(m) = t.parse::<MonthKey>() {
            return Ok(PeriodPreset::Month(m));
        }
        Err(ValidationError::UnknownValue {
            field: "period",
            value: s.trim().to_string(),
        })
    }
}
