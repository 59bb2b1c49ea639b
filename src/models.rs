// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::period::MonthKey;

/// The two household countries. Each carries exactly one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "PT")]
    Portugal,
    #[serde(rename = "BR")]
    Brazil,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::Portugal, Country::Brazil];

    pub fn code(&self) -> &'static str {
        match self {
            Country::Portugal => "PT",
            Country::Brazil => "BR",
        }
    }

    pub fn currency(&self) -> &'static str {
        match self {
            Country::Portugal => "EUR",
            Country::Brazil => "BRL",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PT" | "PORTUGAL" | "EUR" => Ok(Country::Portugal),
            "BR" | "BRASIL" | "BRAZIL" | "BRL" => Ok(Country::Brazil),
            other => Err(ValidationError::UnknownValue {
                field: "country",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    Expense,
    Income,
    Transfer,
    InvoicePayment,
}

impl TxType {
    /// Money leaving the household in cash terms.
    pub fn is_outflow(&self) -> bool {
        matches!(self, TxType::Expense | TxType::InvoicePayment)
    }

    pub fn is_inflow(&self) -> bool {
        matches!(self, TxType::Income)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Expense => "EXPENSE",
            TxType::Income => "INCOME",
            TxType::Transfer => "TRANSFER",
            TxType::InvoicePayment => "INVOICE_PAYMENT",
        }
    }
}

impl FromStr for TxType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "EXPENSE" | "DESPESA" => Ok(TxType::Expense),
            "INCOME" | "RECEITA" => Ok(TxType::Income),
            "TRANSFER" | "TRANSFERENCIA" | "TRANSFERÊNCIA" => Ok(TxType::Transfer),
            "INVOICE_PAYMENT" | "PAGAMENTO_FATURA" => Ok(TxType::InvoicePayment),
            other => Err(ValidationError::UnknownValue {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    Paid,
    Pending,
    Overdue,
    Planned,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Paid => "PAID",
            TxStatus::Pending => "PENDING",
            TxStatus::Overdue => "OVERDUE",
            TxStatus::Planned => "PLANNED",
        }
    }
}

impl FromStr for TxStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PAID" | "PAGO" => Ok(TxStatus::Paid),
            "PENDING" | "PENDENTE" => Ok(TxStatus::Pending),
            "OVERDUE" | "ATRASADO" | "VENCIDO" => Ok(TxStatus::Overdue),
            "PLANNED" | "PREVISTO" | "PLANEJADO" => Ok(TxStatus::Planned),
            other => Err(ValidationError::UnknownValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Origin {
    #[default]
    Manual,
    Imported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: String,
    #[serde(default)]
    pub installment: Option<u32>,
    #[serde(default)]
    pub installments: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub r#type: TxType,
    pub country: Country,
    pub category_id: String,
    pub account_item_id: String,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    pub amount: Decimal, // country currency, never negative
    pub date: NaiveDate, // scheduled payment
    #[serde(default)]
    pub competency_date: Option<NaiveDate>,
    pub description: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    pub status: TxStatus,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

impl Transaction {
    /// Date used for period aggregation: competency first, payment date otherwise.
    pub fn resolved_date(&self) -> NaiveDate {
        self.competency_date.unwrap_or(self.date)
    }

    pub fn is_paid(&self) -> bool {
        self.status == TxStatus::Paid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    Expense,
    Income,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Expense => "EXPENSE",
            FlowType::Income => "INCOME",
        }
    }
}

impl FromStr for FlowType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXPENSE" | "DESPESA" => Ok(FlowType::Expense),
            "INCOME" | "RECEITA" => Ok(FlowType::Income),
            other => Err(ValidationError::UnknownValue {
                field: "flow",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountItem {
    pub id: String,
    pub name: String,
    pub country: Country,
    #[serde(default)]
    pub default_supplier: Option<String>,
    #[serde(default)]
    pub default_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub flow: FlowType,
    #[serde(default)]
    pub items: Vec<AccountItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    #[serde(default)]
    pub account_item_id: Option<String>,
    pub year: i32,
    pub month: u32,
    pub country: Country,
    pub amount: Decimal,
}

impl Budget {
    pub fn month_key(&self) -> Option<MonthKey> {
        MonthKey::new(self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAsset {
    pub id: String,
    pub name: String,
    pub country: Country,
    pub current_value: Decimal,
    #[serde(default)]
    pub kind: Option<String>,
}

/// A Brazilian social-security (INSS) contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InssRecord {
    pub id: String,
    pub competency: String, // YYYY-MM
    pub base_salary: Decimal,
    pub rate: Decimal, // percent
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: TxStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub transaction_id: String,
    pub file_name: String,
    pub uploaded_on: NaiveDate,
    #[serde(default)]
    pub url: Option<String>,
}
