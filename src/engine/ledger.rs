// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{LedgerEntry, ParseFieldError, TransactionKind, TransactionPatch};
use crate::store::TransactionStore;
use anyhow::Result;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Label and color used when an expense has no resolvable category.
pub const FALLBACK_CATEGORY_LABEL: &str = "Other";
pub const FALLBACK_CATEGORY_COLOR: &str = "#9e9e9e";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Pending,
}

impl FromStr for StatusFilter {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "paid" => Ok(StatusFilter::Paid),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(ParseFieldError {
                field: "status filter",
                value: s.to_string(),
                expected: "all|paid|pending",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Date,
    Description,
    Category,
    Amount,
}

impl SortKey {
    /// Direction applied when the user switches to this key without giving
    /// one: amounts read biggest-first, everything else ascending.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortKey::Amount => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "description" => Ok(SortKey::Description),
            "category" => Ok(SortKey::Category),
            "amount" => Ok(SortKey::Amount),
            _ => Err(ParseFieldError {
                field: "sort key",
                value: s.to_string(),
                expected: "date|description|category|amount",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(ParseFieldError {
                field: "sort direction",
                value: s.to_string(),
                expected: "asc|desc",
            }),
        }
    }
}

/// The active view filters. Cheap to rebuild and re-run on every change.
#[derive(Debug, Clone)]
pub struct FilterContext {
    pub month: u32,
    pub year: i32,
    pub day: Option<u32>,
    pub owner_id: Option<i64>,
    pub card_id: Option<i64>,
    pub status: StatusFilter,
    pub query: Option<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterContext {
    pub fn for_period(month: u32, year: i32) -> Self {
        FilterContext {
            month,
            year,
            day: None,
            owner_id: None,
            card_id: None,
            status: StatusFilter::All,
            query: None,
            sort_key: SortKey::Date,
            sort_direction: SortDirection::Asc,
        }
    }
}

/// Whether one entry survives the filter chain. Checks run cheapest-first
/// and short-circuit on the first miss: period, day, card, owner, status,
/// then the free-text scan.
fn matches(entry: &LedgerEntry, ctx: &FilterContext) -> bool {
    if entry.effective_month != ctx.month || entry.effective_year != ctx.year {
        return false;
    }
    if let Some(day) = ctx.day {
        if entry.tx.billing_date.day() != day {
            return false;
        }
    }
    if let Some(card_id) = ctx.card_id {
        if entry.tx.card_id != Some(card_id) {
            return false;
        }
    }
    if let Some(owner_id) = ctx.owner_id {
        if entry.tx.owner_id != Some(owner_id) {
            return false;
        }
    }
    match ctx.status {
        StatusFilter::All => {}
        StatusFilter::Paid if !entry.tx.paid => return false,
        StatusFilter::Pending if entry.tx.paid => return false,
        _ => {}
    }
    if let Some(query) = &ctx.query {
        if !text_matches(entry, query) {
            return false;
        }
    }
    true
}

/// Case-insensitive substring match over description, category display name
/// and owner display name.
fn text_matches(entry: &LedgerEntry, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    entry.tx.description.to_lowercase().contains(&needle)
        || entry
            .category_name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
        || entry
            .owner_name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
}

pub fn filter_entries(entries: &[LedgerEntry], ctx: &FilterContext) -> Vec<LedgerEntry> {
    entries
        .iter()
        .filter(|e| matches(e, ctx))
        .cloned()
        .collect()
}

fn display_category(entry: &LedgerEntry) -> &str {
    entry
        .category_name
        .as_deref()
        .unwrap_or(FALLBACK_CATEGORY_LABEL)
}

pub fn sort_entries(entries: &mut [LedgerEntry], key: SortKey, direction: SortDirection) {
    entries.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Date => a.tx.billing_date.cmp(&b.tx.billing_date),
            SortKey::Amount => a.tx.amount.cmp(&b.tx.amount),
            SortKey::Description => a
                .tx
                .description
                .to_lowercase()
                .cmp(&b.tx.description.to_lowercase()),
            SortKey::Category => display_category(a)
                .to_lowercase()
                .cmp(&display_category(b).to_lowercase()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

/// Totals over the filtered set. With a card filter active the view models
/// "this invoice", where income is not meaningful: income and balance are
/// reported as zero and only the expense total is kept.
pub fn summarize(entries: &[LedgerEntry], card_filter_active: bool) -> LedgerSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    for entry in entries {
        match entry.tx.kind {
            TransactionKind::Income => total_income += entry.tx.amount,
            TransactionKind::Expense => total_expense += entry.tx.amount,
        }
    }
    if card_filter_active {
        return LedgerSummary {
            total_income: Decimal::ZERO,
            total_expense,
            balance: Decimal::ZERO,
        };
    }
    LedgerSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }
}

/// One slice of the expense-by-category breakdown feeding the dashboard
/// chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category_id: Option<i64>,
    pub name: String,
    pub color: String,
    pub total: Decimal,
}

/// Expenses grouped by category, summed and sorted biggest-first. Entries
/// whose category reference cannot be resolved fold into a neutral
/// "Other" slice.
pub fn category_breakdown(entries: &[LedgerEntry]) -> Vec<CategorySlice> {
    let mut slices: HashMap<Option<i64>, CategorySlice> = HashMap::new();
    for entry in entries {
        if entry.tx.kind != TransactionKind::Expense {
            continue;
        }
        let slice = slices
            .entry(entry.tx.category_id)
            .or_insert_with(|| CategorySlice {
                category_id: entry.tx.category_id,
                name: entry
                    .category_name
                    .clone()
                    .unwrap_or_else(|| FALLBACK_CATEGORY_LABEL.to_string()),
                color: entry
                    .category_color
                    .clone()
                    .unwrap_or_else(|| FALLBACK_CATEGORY_COLOR.to_string()),
                total: Decimal::ZERO,
            });
        slice.total += entry.tx.amount;
    }
    let mut out: Vec<CategorySlice> = slices.into_values().collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    out
}

/// A fully materialized monthly view: filtered and sorted entries plus the
/// derived totals and the category breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerView {
    pub entries: Vec<LedgerEntry>,
    pub summary: LedgerSummary,
    pub by_category: Vec<CategorySlice>,
}

pub fn aggregate(entries: &[LedgerEntry], ctx: &FilterContext) -> LedgerView {
    let mut filtered = filter_entries(entries, ctx);
    sort_entries(&mut filtered, ctx.sort_key, ctx.sort_direction);
    let summary = summarize(&filtered, ctx.card_id.is_some());
    let by_category = category_breakdown(&filtered);
    LedgerView {
        entries: filtered,
        summary,
        by_category,
    }
}

/// The single in-memory ledger for one billing period. Replaced wholesale on
/// month navigation, never incrementally patched from a stream; local
/// patches exist only to keep an already-loaded view coherent after a
/// successful store write.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    month: u32,
    year: i32,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Fetch one month's records from the collaborator and build the ledger.
    pub fn load(store: &dyn TransactionStore, month: u32, year: i32) -> Result<Self> {
        let entries = store.fetch_transactions(month, year)?;
        Ok(Ledger {
            month,
            year,
            entries,
        })
    }

    pub fn period(&self) -> (u32, i32) {
        (self.month, self.year)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Swap in a different period's records wholesale.
    pub fn replace(&mut self, month: u32, year: i32, entries: Vec<LedgerEntry>) {
        self.month = month;
        self.year = year;
        self.entries = entries;
    }

    /// Merge a patch into the loaded copy of one entry, mirroring a write
    /// that already succeeded at the store. Denormalized display fields for
    /// a re-pointed reference are dropped rather than left stale; the next
    /// load re-resolves them. Returns false when the id is not loaded.
    pub fn apply_local_patch(&mut self, id: &str, patch: &TransactionPatch) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.tx.id == id) else {
            return false;
        };
        if let Some(description) = &patch.description {
            entry.tx.description = description.clone();
        }
        if let Some(amount) = patch.amount {
            entry.tx.amount = amount;
        }
        if let Some(category_id) = patch.category_id {
            entry.tx.category_id = Some(category_id);
            entry.category_name = None;
            entry.category_color = None;
        }
        if let Some(owner_id) = patch.owner_id {
            entry.tx.owner_id = Some(owner_id);
            entry.owner_name = None;
        }
        if let Some(paid) = patch.paid {
            entry.tx.paid = paid;
        }
        true
    }

    /// Drop every loaded entry (logout).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn view(&self, ctx: &FilterContext) -> LedgerView {
        aggregate(&self.entries, ctx)
    }
}
