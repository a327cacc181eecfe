// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The calendar month an expense is attributed to for invoice and dashboard
/// purposes. May differ from the purchase month for card expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub month: u32,
    pub year: i32,
}

impl BillingPeriod {
    pub fn new(month: u32, year: i32) -> Self {
        BillingPeriod { month, year }
    }

    /// The same period shifted forward by `offset` months.
    pub fn plus_months(&self, offset: u32) -> Self {
        let (month, year) = add_months(self.month, self.year, offset);
        BillingPeriod { month, year }
    }
}

/// Decide which month's invoice a purchase bills against.
///
/// Without a card the billing period is the purchase period unchanged. With a
/// card, a purchase on or after the closing day falls into the next month's
/// invoice (the current cycle already closed). The closing-day test is a
/// plain integer comparison; whether the day exists in the target month is
/// the clamping step's concern, not this one's. Pure in its inputs, no
/// dependence on today.
pub fn resolve_billing_period(
    purchase_day: u32,
    purchase_month: u32,
    purchase_year: i32,
    closing_day: Option<u32>,
) -> BillingPeriod {
    match closing_day {
        Some(closing) if purchase_day >= closing => {
            let (month, year) = add_months(purchase_month, purchase_year, 1);
            BillingPeriod { month, year }
        }
        _ => BillingPeriod {
            month: purchase_month,
            year: purchase_year,
        },
    }
}

/// Convenience form over a concrete purchase date.
pub fn resolve_billing_period_for(date: NaiveDate, closing_day: Option<u32>) -> BillingPeriod {
    resolve_billing_period(date.day(), date.month(), date.year(), closing_day)
}

/// Month arithmetic with year rollover; `month` is 1-12.
pub fn add_months(month: u32, year: i32, offset: u32) -> (u32, i32) {
    let zero_based = (month - 1) + offset;
    ((zero_based % 12) + 1, year + (zero_based / 12) as i32)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    // First day of the following month, stepped back one day.
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Concrete date for a billing period, clamping the anchor day into the
/// month's length: a day-31 anchor lands on Feb 28/29, Apr 30, and so on.
/// The clamp is per target month; different months in an installment
/// sequence have different lengths.
pub fn clamped_date(year: i32, month: u32, anchor_day: u32) -> NaiveDate {
    let day = anchor_day.clamp(1, days_in_month(year, month));
    // month always arrives normalized to 1-12 here
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
