// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use parcela::engine::scope::{BatchScope, invoice_targets, resolve_targets};
use parcela::models::{
    LedgerEntry, PaymentMethod, Transaction, TransactionKind,
};
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn member(id: &str, current: u32, total: u32) -> Transaction {
    Transaction {
        id: id.to_string(),
        group_id: Some("g1".to_string()),
        description: format!("Sofa ({}/{})", current, total),
        amount: Decimal::new(10000, 2),
        kind: TransactionKind::Expense,
        purchase_date: date(2025, 1, 10),
        billing_date: date(2025, current, 10),
        paid: false,
        method: PaymentMethod::CreditCard,
        category_id: None,
        owner_id: None,
        card_id: Some(7),
        installment_current: current,
        installment_total: total,
    }
}

fn group_of_four() -> Vec<Transaction> {
    // deliberately shuffled; resolution must not depend on input order
    vec![
        member("c", 3, 4),
        member("a", 1, 4),
        member("d", 4, 4),
        member("b", 2, 4),
    ]
}

#[test]
fn single_scope_touches_only_the_target() {
    let ids = resolve_targets(&group_of_four(), "b", BatchScope::Single);
    assert_eq!(ids, vec!["b"]);
}

#[test]
fn all_scope_touches_the_whole_group_in_order() {
    let ids = resolve_targets(&group_of_four(), "b", BatchScope::All);
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[test]
fn future_scope_is_inclusive_of_the_target() {
    let ids = resolve_targets(&group_of_four(), "b", BatchScope::Future);
    assert_eq!(ids, vec!["b", "c", "d"]);
}

#[test]
fn past_scope_is_inclusive_of_the_target() {
    let ids = resolve_targets(&group_of_four(), "c", BatchScope::Past);
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn future_from_last_member_is_just_the_target() {
    let ids = resolve_targets(&group_of_four(), "d", BatchScope::Future);
    assert_eq!(ids, vec!["d"]);
}

#[test]
fn past_from_first_member_is_just_the_target() {
    let ids = resolve_targets(&group_of_four(), "a", BatchScope::Past);
    assert_eq!(ids, vec!["a"]);
}

#[test]
fn missing_target_yields_no_work() {
    for scope in [
        BatchScope::Single,
        BatchScope::All,
        BatchScope::Future,
        BatchScope::Past,
    ] {
        assert!(resolve_targets(&group_of_four(), "nope", scope).is_empty());
    }
}

#[test]
fn scope_parses_spelled_out_forms() {
    assert_eq!("single".parse::<BatchScope>().unwrap(), BatchScope::Single);
    assert_eq!("this".parse::<BatchScope>().unwrap(), BatchScope::Single);
    assert_eq!("ALL".parse::<BatchScope>().unwrap(), BatchScope::All);
    assert_eq!("future".parse::<BatchScope>().unwrap(), BatchScope::Future);
    assert_eq!("past".parse::<BatchScope>().unwrap(), BatchScope::Past);
    assert!("sideways".parse::<BatchScope>().is_err());
}

fn entry(id: &str, card_id: Option<i64>, paid: bool, kind: TransactionKind) -> LedgerEntry {
    let mut tx = member(id, 1, 1);
    tx.group_id = None;
    tx.card_id = card_id;
    tx.paid = paid;
    tx.kind = kind;
    LedgerEntry::new(tx, None, None, None, None)
}

#[test]
fn invoice_targets_pick_pending_expenses_on_the_card() {
    let entries = vec![
        entry("keep1", Some(7), false, TransactionKind::Expense),
        entry("other_card", Some(8), false, TransactionKind::Expense),
        entry("no_card", None, false, TransactionKind::Expense),
        entry("already_paid", Some(7), true, TransactionKind::Expense),
        entry("income", Some(7), false, TransactionKind::Income),
        entry("keep2", Some(7), false, TransactionKind::Expense),
    ];
    let ids = invoice_targets(&entries, 7);
    assert_eq!(ids, vec!["keep1", "keep2"]);
}

#[test]
fn settled_invoice_yields_no_targets() {
    let entries = vec![entry("paid", Some(7), true, TransactionKind::Expense)];
    assert!(invoice_targets(&entries, 7).is_empty());
}
