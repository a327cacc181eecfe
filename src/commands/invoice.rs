// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::billing::clamped_date;
use crate::engine::ledger::{FilterContext, Ledger, StatusFilter};
use crate::engine::scope;
use crate::models::TransactionPatch;
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::{
    card_by_ref, current_period, fmt_money, maybe_print_json, month_key, parse_month,
    pretty_table, short_id,
};
use anyhow::{Result, bail};
use log::warn;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_of(sub: &clap::ArgMatches) -> Result<(u32, i32)> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(current_period()),
    }
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let card = card_by_ref(conn, sub.get_one::<String>("card").unwrap())?;
    let (month, year) = period_of(sub)?;
    let status: StatusFilter = sub.get_one::<String>("status").unwrap().parse()?;

    let store = SqliteStore::new(conn);
    let ledger = Ledger::load(&store, month, year)?;
    let ctx = FilterContext {
        card_id: Some(card.id),
        status,
        ..FilterContext::for_period(month, year)
    };
    let view = ledger.view(&ctx);

    if maybe_print_json(json_flag, jsonl_flag, &view.entries)? {
        return Ok(());
    }

    let due = clamped_date(year, month, card.due_day);
    println!(
        "Invoice for {} ({}, due {})",
        card.name,
        month_key(month, year),
        due
    );
    let rows: Vec<Vec<String>> = view
        .entries
        .iter()
        .map(|e| {
            vec![
                short_id(&e.tx.id).to_string(),
                e.tx.billing_date.to_string(),
                e.tx.description.clone(),
                fmt_money(&e.tx.amount),
                if e.tx.paid { "yes".into() } else { "".into() },
                e.owner_name.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Billing", "Description", "Amount", "Paid", "Owner"], rows)
    );
    // Card views only total the charges; income never lands on an invoice.
    println!("Invoice total {}", fmt_money(&view.summary.total_expense));
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let card = card_by_ref(conn, sub.get_one::<String>("card").unwrap())?;
    let (month, year) = period_of(sub)?;

    let store = SqliteStore::new(conn);
    let ledger = Ledger::load(&store, month, year)?;
    let targets = scope::invoice_targets(ledger.entries(), card.id);
    if targets.is_empty() {
        println!(
            "No pending charges on {} for {}; nothing to pay.",
            card.name,
            month_key(month, year)
        );
        return Ok(());
    }

    let patch = TransactionPatch {
        paid: Some(true),
        ..Default::default()
    };
    let mut paid_count = 0usize;
    let mut failures: Vec<String> = Vec::new();
    for id in &targets {
        match store.update_transaction(id, &patch) {
            Ok(()) => paid_count += 1,
            Err(e) => {
                warn!("paying {} failed: {e:#}", id);
                failures.push(format!("{}: {e:#}", short_id(id)));
            }
        }
    }
    if !failures.is_empty() {
        bail!(
            "Paid {} of {} charge(s); failures: {}",
            paid_count,
            targets.len(),
            failures.join("; ")
        );
    }
    println!(
        "Paid {} charge(s) on {} for {}",
        paid_count,
        card.name,
        month_key(month, year)
    );
    Ok(())
}
