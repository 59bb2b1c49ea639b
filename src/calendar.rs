// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! iCalendar export of scheduled payments.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::fx::ViewMode;
use crate::index::CategoryIndex;
use crate::models::{Country, InssRecord, Transaction};
use crate::period::Period;

const MAX_LINE_OCTETS: usize = 75;

pub struct IcsOptions {
    pub period: Period,
    pub view: ViewMode,
    /// Written as DTSTAMP on every event.
    pub stamp: NaiveDateTime,
}

struct Event {
    uid: String,
    date: NaiveDate,
    summary: String,
    description: String,
    category: String,
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Split a content line into 75-octet chunks joined by CRLF + space.
pub fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut used = 0usize;
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        let w = c.len_utf8();
        if used + w > limit {
            out.push_str("\r\n ");
            used = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        out.push(c);
        used += w;
    }
    out
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(&fold_line(line));
    buf.push_str("\r\n");
}

/// One all-day event per transaction due inside the period and per INSS
/// contribution, unless that contribution is already exported through its
/// linked transaction.
pub fn export_ics(
    transactions: &[Transaction],
    inss: &[InssRecord],
    index: &CategoryIndex,
    opts: &IcsOptions,
) -> String {
    let mut events = Vec::new();
    let mut exported: HashSet<&str> = HashSet::new();

    for t in transactions
        .iter()
        .filter(|t| opts.view.includes(t.country) && opts.period.contains(t.date))
    {
        exported.insert(t.id.as_str());
        let category = index.category_name(&t.category_id).to_string();
        let label = if t.description.is_empty() {
            category.clone()
        } else {
            t.description.clone()
        };
        events.push(Event {
            uid: format!("tx-{}@homeledger", t.id),
            date: t.date,
            summary: format!("{} - {:.2} {}", label, t.amount, t.country.currency()),
            description: format!(
                "{} | {} / {} | {}",
                t.r#type.as_str(),
                category,
                index.item_name(&t.category_id, &t.account_item_id),
                t.status.as_str()
            ),
            category,
        });
    }

    if opts.view.includes(Country::Brazil) {
        for r in inss.iter().filter(|r| opts.period.contains(r.due_date)) {
            if r
                .transaction_id
                .as_deref()
                .is_some_and(|id| exported.contains(id))
            {
                continue;
            }
            events.push(Event {
                uid: format!("inss-{}@homeledger", r.id),
                date: r.due_date,
                summary: format!("INSS {} - {:.2} BRL", r.competency, r.amount),
                description: format!(
                    "Base {:.2} x {}% | {}",
                    r.base_salary,
                    r.rate,
                    r.status.as_str()
                ),
                category: "INSS".to_string(),
            });
        }
    }

    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.uid.cmp(&b.uid)));

    let stamp = opts.stamp.format("%Y%m%dT%H%M%SZ").to_string();
    let mut buf = String::new();
    push_line(&mut buf, "BEGIN:VCALENDAR");
    push_line(&mut buf, "VERSION:2.0");
    push_line(&mut buf, "PRODID:-//homeledger//calendar//EN");
    push_line(&mut buf, "CALSCALE:GREGORIAN");
    push_line(&mut buf, "X-WR-CALNAME:Homeledger");
    for e in &events {
        let next = e.date + Duration::days(1);
        push_line(&mut buf, "BEGIN:VEVENT");
        push_line(&mut buf, &format!("UID:{}", e.uid));
        push_line(&mut buf, &format!("DTSTAMP:{}", stamp));
        push_line(&mut buf, &format!("DTSTART;VALUE=DATE:{}", e.date.format("%Y%m%d")));
        push_line(&mut buf, &format!("DTEND;VALUE=DATE:{}", next.format("%Y%m%d")));
        push_line(&mut buf, &format!("SUMMARY:{}", escape_text(&e.summary)));
        push_line(&mut buf, &format!("DESCRIPTION:{}", escape_text(&e.description)));
        push_line(&mut buf, &format!("CATEGORIES:{}", escape_text(&e.category)));
        push_line(&mut buf, "END:VEVENT");
    }
    push_line(&mut buf, "END:VCALENDAR");
    buf
}
