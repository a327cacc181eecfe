// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}' (expected {expected})")]
pub struct ParseFieldError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
}

/// A credit card; `closing_day` is the invoice cutoff. Purchases on or after
/// it bill to the next month's invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub closing_day: u32,
    pub due_day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Uppercase form used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TransactionKind {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(ParseFieldError {
                field: "transaction type",
                value: s.to_string(),
                expected: "income|expense",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    CreditCard,
    Pix,
    Boleto,
    Cash,
    DebitCard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Boleto => "boleto",
            PaymentMethod::Cash => "cash",
            PaymentMethod::DebitCard => "debit-card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit-card" | "credit" => Ok(PaymentMethod::CreditCard),
            "pix" => Ok(PaymentMethod::Pix),
            "boleto" => Ok(PaymentMethod::Boleto),
            "cash" => Ok(PaymentMethod::Cash),
            "debit-card" | "debit" => Ok(PaymentMethod::DebitCard),
            _ => Err(ParseFieldError {
                field: "payment method",
                value: s.to_string(),
                expected: "credit-card|pix|boleto|cash|debit-card",
            }),
        }
    }
}

/// One ledger entry. For a multi-installment purchase there are
/// `installment_total` of these, sharing a `group_id`, each carrying its own
/// share of the original amount and its own billing date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub purchase_date: NaiveDate,
    /// The date this entry is due/billed. Derived at creation, never
    /// user-entered; equals `purchase_date` when no card is attached.
    pub billing_date: NaiveDate,
    pub paid: bool,
    pub method: PaymentMethod,
    pub category_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub card_id: Option<i64>,
    pub installment_current: u32,
    pub installment_total: u32,
}

impl Transaction {
    pub fn is_installment(&self) -> bool {
        self.installment_total > 1
    }
}

/// Partial update for a stored transaction. `None` fields are omitted from
/// the write entirely; they are not sent as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub paid: Option<bool>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category_id.is_none()
            && self.owner_id.is_none()
            && self.paid.is_none()
    }
}

/// A transaction as loaded for the monthly view: the stored record plus the
/// display fields the collaborator denormalizes onto it, plus the derived
/// effective billing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub tx: Transaction,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub owner_name: Option<String>,
    pub card_name: Option<String>,
    /// Derived from `billing_date` on every load; never persisted.
    pub effective_month: u32,
    pub effective_year: i32,
}

impl LedgerEntry {
    pub fn new(
        tx: Transaction,
        category_name: Option<String>,
        category_color: Option<String>,
        owner_name: Option<String>,
        card_name: Option<String>,
    ) -> Self {
        let effective_month = tx.billing_date.month();
        let effective_year = tx.billing_date.year();
        LedgerEntry {
            tx,
            category_name,
            category_color,
            owner_name,
            card_name,
            effective_month,
            effective_year,
        }
    }
}
