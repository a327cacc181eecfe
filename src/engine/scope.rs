// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{LedgerEntry, ParseFieldError, Transaction, TransactionKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Breadth of an edit/delete/pay action relative to an installment group.
/// `Future` and `Past` are inclusive of the targeted installment itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchScope {
    Single,
    All,
    Future,
    Past,
}

impl fmt::Display for BatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchScope::Single => "single",
            BatchScope::All => "all",
            BatchScope::Future => "future",
            BatchScope::Past => "past",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BatchScope {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "this" => Ok(BatchScope::Single),
            "all" => Ok(BatchScope::All),
            "future" => Ok(BatchScope::Future),
            "past" => Ok(BatchScope::Past),
            _ => Err(ParseFieldError {
                field: "scope",
                value: s.to_string(),
                expected: "single|all|future|past",
            }),
        }
    }
}

/// Resolve which members of an installment group an action touches.
///
/// The group is ordered by installment number, ties broken by purchase date
/// ascending; the scope then selects the target alone, the whole group, or
/// the inclusive suffix/prefix around the target. A target that is not in
/// the group (stale view, concurrent delete) yields an empty set, which the
/// caller treats as a no-op rather than an error.
pub fn resolve_targets(group: &[Transaction], target_id: &str, scope: BatchScope) -> Vec<String> {
    let mut ordered: Vec<&Transaction> = group.iter().collect();
    ordered.sort_by(|a, b| {
        a.installment_current
            .cmp(&b.installment_current)
            .then(a.purchase_date.cmp(&b.purchase_date))
    });

    let Some(pos) = ordered.iter().position(|t| t.id == target_id) else {
        return Vec::new();
    };

    let picked: &[&Transaction] = match scope {
        BatchScope::Single => &ordered[pos..=pos],
        BatchScope::All => &ordered[..],
        BatchScope::Future => &ordered[pos..],
        BatchScope::Past => &ordered[..=pos],
    };
    picked.iter().map(|t| t.id.clone()).collect()
}

/// "Pay entire invoice": every visible unpaid expense billed to the card in
/// the loaded period. A separate mode from [`BatchScope`]: it ranges over
/// the card-filtered view, not over an installment group.
pub fn invoice_targets(entries: &[LedgerEntry], card_id: i64) -> Vec<String> {
    entries
        .iter()
        .filter(|e| {
            e.tx.card_id == Some(card_id) && !e.tx.paid && e.tx.kind == TransactionKind::Expense
        })
        .map(|e| e.tx.id.clone())
        .collect()
}
