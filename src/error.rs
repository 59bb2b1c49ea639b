// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Input rejected before anything is written to the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },
    #[error("Invalid date '{0}', expected YYYY-MM-DD, DD/MM/YYYY, YYYY-MM or MM/YYYY")]
    InvalidDate(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: String },
    #[error("{field} '{value}' is out of range")]
    OutOfRange { field: &'static str, value: String },
    #[error("Unknown setting '{0}' (use view|projection_months|fallback_rate)")]
    UnknownSetting(String),
}
