// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::billing::{self, BillingPeriod};
use crate::models::{CreditCard, PaymentMethod, Transaction, TransactionKind};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Trailing " (i/N)" marker appended to installment descriptions.
static SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d+/\d+\)\s*$").expect("installment suffix pattern"));

/// One user-entered purchase, before it is split into dated records.
#[derive(Debug, Clone)]
pub struct SplitRequest<'a> {
    pub description: &'a str,
    pub total_amount: Decimal,
    /// Requested installment count; non-positive values are treated as 1.
    pub installments: u32,
    pub kind: TransactionKind,
    pub method: PaymentMethod,
    pub purchase_date: NaiveDate,
    pub category_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub card: Option<&'a CreditCard>,
    pub paid: bool,
}

/// Split a purchase into its installment records.
///
/// The first installment bills in the period the resolver assigns to the
/// purchase date (shifted forward when the card's cycle already closed);
/// each subsequent installment rolls one month further, its day re-clamped
/// to that month's length. When the count is greater than one, records share
/// a freshly generated group id, are numbered 1..=count, and carry a
/// " (i/count)" description suffix.
///
/// Amount policy: each of the first count-1 records gets the total divided
/// by count, rounded to cents (midpoint away from zero); the last record
/// absorbs the remainder so the group always sums exactly to the entered
/// total.
pub fn split(req: &SplitRequest) -> Vec<Transaction> {
    let count = req.installments.max(1);
    let base_description = strip_installment_suffix(req.description);
    let anchor_day = req.purchase_date.day();
    let start: BillingPeriod = billing::resolve_billing_period_for(
        req.purchase_date,
        req.card.map(|c| c.closing_day),
    );

    let group_id = (count > 1).then(|| Uuid::new_v4().to_string());
    let per_installment = if count > 1 {
        (req.total_amount / Decimal::from(count))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        req.total_amount
    };

    let mut records = Vec::with_capacity(count as usize);
    for i in 0..count {
        let period = start.plus_months(i);
        let billing_date = billing::clamped_date(period.year, period.month, anchor_day);
        let amount = if i == count - 1 {
            // last installment absorbs the division remainder
            req.total_amount - per_installment * Decimal::from(count - 1)
        } else {
            per_installment
        };
        let description = if count > 1 {
            installment_description(&base_description, i + 1, count)
        } else {
            base_description.clone()
        };
        records.push(Transaction {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.clone(),
            description,
            amount,
            kind: req.kind,
            purchase_date: req.purchase_date,
            billing_date,
            paid: req.paid,
            method: req.method,
            category_id: req.category_id,
            owner_id: req.owner_id,
            card_id: req.card.map(|c| c.id),
            installment_current: i + 1,
            installment_total: count,
        });
    }
    records
}

/// `"Sofa" -> "Sofa (2/10)"`. Cosmetic only; strip before re-editing.
pub fn installment_description(base: &str, current: u32, total: u32) -> String {
    format!("{} ({}/{})", base, current, total)
}

/// Remove a trailing installment marker, recovering the base description.
pub fn strip_installment_suffix(description: &str) -> String {
    SUFFIX_RE.replace(description, "").trim_end().to_string()
}
