// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use parcela::engine::ledger::{
    FALLBACK_CATEGORY_COLOR, FALLBACK_CATEGORY_LABEL, FilterContext, Ledger, SortDirection,
    SortKey, StatusFilter, category_breakdown, summarize,
};
use parcela::models::{
    LedgerEntry, PaymentMethod, Transaction, TransactionKind, TransactionPatch,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

struct EntrySeed<'a> {
    id: &'a str,
    description: &'a str,
    amount: &'a str,
    kind: TransactionKind,
    billing: NaiveDate,
    paid: bool,
    owner: Option<(i64, &'a str)>,
    card_id: Option<i64>,
    category: Option<(i64, &'a str, &'a str)>,
}

impl Default for EntrySeed<'_> {
    fn default() -> Self {
        EntrySeed {
            id: "t",
            description: "Entry",
            amount: "10.00",
            kind: TransactionKind::Expense,
            billing: date(2025, 3, 10),
            paid: false,
            owner: None,
            card_id: None,
            category: None,
        }
    }
}

fn entry(seed: EntrySeed) -> LedgerEntry {
    let tx = Transaction {
        id: seed.id.to_string(),
        group_id: None,
        description: seed.description.to_string(),
        amount: dec(seed.amount),
        kind: seed.kind,
        purchase_date: seed.billing,
        billing_date: seed.billing,
        paid: seed.paid,
        method: if seed.card_id.is_some() {
            PaymentMethod::CreditCard
        } else {
            PaymentMethod::Pix
        },
        category_id: seed.category.map(|(id, _, _)| id),
        owner_id: seed.owner.map(|(id, _)| id),
        card_id: seed.card_id,
        installment_current: 1,
        installment_total: 1,
    };
    LedgerEntry::new(
        tx,
        seed.category.map(|(_, name, _)| name.to_string()),
        seed.category.map(|(_, _, color)| color.to_string()),
        seed.owner.map(|(_, name)| name.to_string()),
        None,
    )
}

fn march_ledger(entries: Vec<LedgerEntry>) -> Ledger {
    let mut ledger = Ledger::default();
    ledger.replace(3, 2025, entries);
    ledger
}

#[test]
fn effective_period_comes_from_billing_date() {
    let e = entry(EntrySeed {
        billing: date(2026, 1, 5),
        ..Default::default()
    });
    assert_eq!((e.effective_month, e.effective_year), (1, 2026));
}

#[test]
fn view_keeps_only_the_loaded_period() {
    let ledger = march_ledger(vec![
        entry(EntrySeed {
            id: "in",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "out",
            billing: date(2025, 4, 2),
            ..Default::default()
        }),
    ]);
    let view = ledger.view(&FilterContext::for_period(3, 2025));
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].tx.id, "in");
}

#[test]
fn day_filter_narrows_to_one_billing_day() {
    let ledger = march_ledger(vec![
        entry(EntrySeed {
            id: "d10",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "d11",
            billing: date(2025, 3, 11),
            ..Default::default()
        }),
    ]);
    let ctx = FilterContext {
        day: Some(11),
        ..FilterContext::for_period(3, 2025)
    };
    let view = ledger.view(&ctx);
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].tx.id, "d11");
}

#[test]
fn owner_filter_drops_unassigned_entries() {
    let ledger = march_ledger(vec![
        entry(EntrySeed {
            id: "ana",
            owner: Some((1, "Ana")),
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "bo",
            owner: Some((2, "Bo")),
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "none",
            ..Default::default()
        }),
    ]);
    let ctx = FilterContext {
        owner_id: Some(1),
        ..FilterContext::for_period(3, 2025)
    };
    let view = ledger.view(&ctx);
    let ids: Vec<&str> = view
        .entries
        .iter()
        .map(|e| e.tx.id.as_str())
        .collect();
    assert_eq!(ids, vec!["ana"]);
}

#[test]
fn status_filter_splits_paid_and_pending() {
    let ledger = march_ledger(vec![
        entry(EntrySeed {
            id: "done",
            paid: true,
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "open",
            ..Default::default()
        }),
    ]);
    let paid = FilterContext {
        status: StatusFilter::Paid,
        ..FilterContext::for_period(3, 2025)
    };
    let pending = FilterContext {
        status: StatusFilter::Pending,
        ..FilterContext::for_period(3, 2025)
    };
    assert_eq!(ledger.view(&paid).entries[0].tx.id, "done");
    assert_eq!(ledger.view(&pending).entries[0].tx.id, "open");
}

#[test]
fn text_search_spans_description_category_and_owner() {
    let ledger = march_ledger(vec![
        entry(EntrySeed {
            id: "by_desc",
            description: "Supermarket run",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "by_cat",
            description: "Weekly",
            category: Some((5, "Market", "#112233")),
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "by_owner",
            description: "Shoes",
            owner: Some((1, "Marko")),
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "miss",
            description: "Fuel",
            ..Default::default()
        }),
    ]);
    let ctx = FilterContext {
        query: Some("MARK".to_string()),
        ..FilterContext::for_period(3, 2025)
    };
    let view = ledger.view(&ctx);
    let ids: Vec<&str> = view
        .entries
        .iter()
        .map(|e| e.tx.id.as_str())
        .collect();
    assert_eq!(ids, vec!["by_desc", "by_cat", "by_owner"]);
}

#[test]
fn amount_sort_defaults_to_biggest_first() {
    assert_eq!(SortKey::Amount.default_direction(), SortDirection::Desc);
    assert_eq!(SortKey::Date.default_direction(), SortDirection::Asc);

    let ledger = march_ledger(vec![
        entry(EntrySeed {
            id: "small",
            amount: "5.00",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "big",
            amount: "500.00",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "mid",
            amount: "50.00",
            ..Default::default()
        }),
    ]);
    let ctx = FilterContext {
        sort_key: SortKey::Amount,
        sort_direction: SortKey::Amount.default_direction(),
        ..FilterContext::for_period(3, 2025)
    };
    let view = ledger.view(&ctx);
    let ids: Vec<&str> = view
        .entries
        .iter()
        .map(|e| e.tx.id.as_str())
        .collect();
    assert_eq!(ids, vec!["big", "mid", "small"]);
}

#[test]
fn description_sort_ignores_case() {
    let ledger = march_ledger(vec![
        entry(EntrySeed {
            id: "z",
            description: "zebra",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "a_up",
            description: "Apple",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "b_low",
            description: "banana",
            ..Default::default()
        }),
    ]);
    let ctx = FilterContext {
        sort_key: SortKey::Description,
        ..FilterContext::for_period(3, 2025)
    };
    let view = ledger.view(&ctx);
    let ids: Vec<&str> = view
        .entries
        .iter()
        .map(|e| e.tx.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a_up", "b_low", "z"]);
}

#[test]
fn summary_balances_income_against_expense() {
    let entries = vec![
        entry(EntrySeed {
            id: "salary",
            amount: "3000.00",
            kind: TransactionKind::Income,
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "rent",
            amount: "1200.00",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "food",
            amount: "300.00",
            ..Default::default()
        }),
    ];
    let summary = summarize(&entries, false);
    assert_eq!(summary.total_income, dec("3000.00"));
    assert_eq!(summary.total_expense, dec("1500.00"));
    assert_eq!(summary.balance, dec("1500.00"));
}

#[test]
fn card_view_reports_only_the_expense_total() {
    let entries = vec![
        entry(EntrySeed {
            id: "salary",
            amount: "3000.00",
            kind: TransactionKind::Income,
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "charge",
            amount: "150.00",
            card_id: Some(7),
            ..Default::default()
        }),
    ];
    let summary = summarize(&entries, true);
    assert_eq!(summary.total_income, Decimal::ZERO);
    assert_eq!(summary.balance, Decimal::ZERO);
    assert_eq!(summary.total_expense, dec("150.00"));
}

#[test]
fn breakdown_sums_per_category_biggest_first() {
    let entries = vec![
        entry(EntrySeed {
            id: "m1",
            amount: "80.00",
            category: Some((5, "Market", "#112233")),
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "m2",
            amount: "40.00",
            category: Some((5, "Market", "#112233")),
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "fuel",
            amount: "200.00",
            category: Some((6, "Fuel", "#445566")),
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "salary",
            amount: "9999.00",
            kind: TransactionKind::Income,
            category: Some((5, "Market", "#112233")),
            ..Default::default()
        }),
    ];
    let slices = category_breakdown(&entries);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].name, "Fuel");
    assert_eq!(slices[0].total, dec("200.00"));
    assert_eq!(slices[1].name, "Market");
    assert_eq!(slices[1].total, dec("120.00"));
}

#[test]
fn uncategorized_expenses_fold_into_the_neutral_slice() {
    let entries = vec![
        entry(EntrySeed {
            id: "u1",
            amount: "10.00",
            ..Default::default()
        }),
        entry(EntrySeed {
            id: "u2",
            amount: "15.00",
            ..Default::default()
        }),
    ];
    let slices = category_breakdown(&entries);
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].name, FALLBACK_CATEGORY_LABEL);
    assert_eq!(slices[0].color, FALLBACK_CATEGORY_COLOR);
    assert_eq!(slices[0].total, dec("25.00"));
    assert_eq!(slices[0].category_id, None);
}

#[test]
fn local_patch_updates_loaded_entry_in_place() {
    let mut ledger = march_ledger(vec![entry(EntrySeed {
        id: "t1",
        amount: "10.00",
        category: Some((5, "Market", "#112233")),
        ..Default::default()
    })]);
    let patch = TransactionPatch {
        amount: Some(dec("12.50")),
        paid: Some(true),
        ..Default::default()
    };
    assert!(ledger.apply_local_patch("t1", &patch));
    let e = &ledger.entries()[0];
    assert_eq!(e.tx.amount, dec("12.50"));
    assert!(e.tx.paid);
    // untouched fields survive
    assert_eq!(e.category_name.as_deref(), Some("Market"));
}

#[test]
fn local_patch_drops_stale_display_names_on_repointing() {
    let mut ledger = march_ledger(vec![entry(EntrySeed {
        id: "t1",
        category: Some((5, "Market", "#112233")),
        owner: Some((1, "Ana")),
        ..Default::default()
    })]);
    let patch = TransactionPatch {
        category_id: Some(6),
        owner_id: Some(2),
        ..Default::default()
    };
    assert!(ledger.apply_local_patch("t1", &patch));
    let e = &ledger.entries()[0];
    assert_eq!(e.tx.category_id, Some(6));
    assert_eq!(e.category_name, None);
    assert_eq!(e.owner_name, None);
}

#[test]
fn local_patch_misses_unloaded_ids() {
    let mut ledger = march_ledger(vec![]);
    let patch = TransactionPatch {
        paid: Some(true),
        ..Default::default()
    };
    assert!(!ledger.apply_local_patch("ghost", &patch));
}

#[test]
fn clear_empties_the_ledger() {
    let mut ledger = march_ledger(vec![entry(EntrySeed::default())]);
    assert_eq!(ledger.entries().len(), 1);
    ledger.clear();
    assert!(ledger.entries().is_empty());
    assert_eq!(ledger.period(), (3, 2025));
}
