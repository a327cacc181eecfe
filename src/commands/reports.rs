// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::ledger::{FilterContext, Ledger};
use crate::store::SqliteStore;
use crate::utils::{
    current_period, fmt_money, maybe_print_json, month_key, parse_month, pretty_table,
    resolve_owner_ref,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("by-category", sub)) => by_category(conn, sub)?,
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

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (month, year) = period_of(sub)?;
    let ctx = FilterContext {
        owner_id: sub
            .get_one::<String>("owner")
            .map(|v| resolve_owner_ref(conn, v))
            .transpose()?,
        ..FilterContext::for_period(month, year)
    };

    let store = SqliteStore::new(conn);
    let view = Ledger::load(&store, month, year)?.view(&ctx);

    if maybe_print_json(json_flag, jsonl_flag, &view.summary)? {
        return Ok(());
    }
    let rows = vec![vec![
        month_key(month, year),
        fmt_money(&view.summary.total_income),
        fmt_money(&view.summary.total_expense),
        fmt_money(&view.summary.balance),
    ]];
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Balance"], rows)
    );
    Ok(())
}

fn by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (month, year) = period_of(sub)?;

    let store = SqliteStore::new(conn);
    let view = Ledger::load(&store, month, year)?.view(&FilterContext::for_period(month, year));

    if maybe_print_json(json_flag, jsonl_flag, &view.by_category)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = view
        .by_category
        .iter()
        .map(|s| vec![s.name.clone(), s.color.clone(), fmt_money(&s.total)])
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Color", "Spent"], rows)
    );
    Ok(())
}
