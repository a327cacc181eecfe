// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::installments::{self, SplitRequest};
use crate::engine::ledger::{FilterContext, Ledger, SortDirection, SortKey, StatusFilter};
use crate::engine::scope::{self, BatchScope};
use crate::models::{PaymentMethod, Transaction, TransactionKind, TransactionPatch};
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::{
    card_by_ref, current_period, fmt_money, maybe_print_json, parse_date, parse_decimal,
    parse_month, pretty_table, resolve_category_ref, resolve_owner_ref, resolve_tx_id, short_id,
};
use anyhow::{Result, bail};
use log::warn;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("pay", sub)) => set_paid(conn, sub, true)?,
        Some(("unpay", sub)) => set_paid(conn, sub, false)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let description = sub.get_one::<String>("description").unwrap().trim();
    let total_amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if total_amount <= Decimal::ZERO {
        bail!("Amount must be positive; the type flag decides income vs expense");
    }
    let purchase_date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind: TransactionKind = sub.get_one::<String>("type").unwrap().parse()?;
    let method: PaymentMethod = sub.get_one::<String>("method").unwrap().parse()?;
    let installment_count = *sub.get_one::<u32>("installments").unwrap();
    let paid = sub.get_flag("paid");

    if kind == TransactionKind::Income && installment_count > 1 {
        bail!("Installments apply to expenses, not income");
    }
    if kind == TransactionKind::Income && method == PaymentMethod::CreditCard {
        bail!("Income cannot be a credit-card charge");
    }

    let card = match (method, sub.get_one::<String>("card")) {
        (PaymentMethod::CreditCard, Some(value)) => Some(card_by_ref(conn, value)?),
        (PaymentMethod::CreditCard, None) => {
            bail!("Credit-card transactions need --card to pick the billing cycle")
        }
        (_, Some(_)) => bail!("--card only applies to credit-card transactions"),
        (_, None) => None,
    };
    let category_id = sub
        .get_one::<String>("category")
        .map(|v| resolve_category_ref(conn, v))
        .transpose()?;
    let owner_id = sub
        .get_one::<String>("owner")
        .map(|v| resolve_owner_ref(conn, v))
        .transpose()?;

    let records = installments::split(&SplitRequest {
        description,
        total_amount,
        installments: installment_count,
        kind,
        method,
        purchase_date,
        category_id,
        owner_id,
        card: card.as_ref(),
        paid,
    });

    // One store call per installment; every call is attempted, and the
    // records that did persist stay persisted even when a later one fails.
    let store = SqliteStore::new(conn);
    let mut created = 0usize;
    let mut failures: Vec<String> = Vec::new();
    for record in &records {
        match store.create_transaction(record) {
            Ok(()) => created += 1,
            Err(e) => {
                warn!(
                    "installment {}/{} failed to persist: {e:#}",
                    record.installment_current, record.installment_total
                );
                failures.push(format!(
                    "{}/{}: {e:#}",
                    record.installment_current, record.installment_total
                ));
            }
        }
    }
    if !failures.is_empty() {
        bail!(
            "Persisted {} of {} installment(s); the rest failed and were not rolled back. \
             Re-submit after checking the ledger. Failures: {}",
            created,
            records.len(),
            failures.join("; ")
        );
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                short_id(&r.id).to_string(),
                r.billing_date.to_string(),
                fmt_money(&r.amount),
                installment_tag(r),
            ]
        })
        .collect();
    println!(
        "Recorded '{}' ({} {}) in {} installment(s)",
        description,
        kind,
        fmt_money(&total_amount),
        records.len()
    );
    println!(
        "{}",
        pretty_table(&["Id", "Billing date", "Amount", "Installment"], rows)
    );
    Ok(())
}

fn installment_tag(tx: &Transaction) -> String {
    if tx.is_installment() {
        format!("{}/{}", tx.installment_current, tx.installment_total)
    } else {
        String::new()
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (month, year) = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => current_period(),
    };

    let sort_key: SortKey = sub.get_one::<String>("sort").unwrap().parse()?;
    let sort_direction: SortDirection = match sub.get_one::<String>("direction") {
        Some(s) => s.parse()?,
        None => sort_key.default_direction(),
    };
    let status: StatusFilter = sub.get_one::<String>("status").unwrap().parse()?;
    let ctx = FilterContext {
        month,
        year,
        day: sub.get_one::<u32>("day").copied(),
        owner_id: sub
            .get_one::<String>("owner")
            .map(|v| resolve_owner_ref(conn, v))
            .transpose()?,
        card_id: sub
            .get_one::<String>("card")
            .map(|v| card_by_ref(conn, v).map(|c| c.id))
            .transpose()?,
        status,
        query: sub.get_one::<String>("search").map(|s| s.to_string()),
        sort_key,
        sort_direction,
    };

    let store = SqliteStore::new(conn);
    let ledger = Ledger::load(&store, month, year)?;
    let mut view = ledger.view(&ctx);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        view.entries.truncate(*limit);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &view.entries)? {
        let rows: Vec<Vec<String>> = view
            .entries
            .iter()
            .map(|e| {
                vec![
                    short_id(&e.tx.id).to_string(),
                    e.tx.billing_date.to_string(),
                    e.tx.description.clone(),
                    fmt_money(&e.tx.amount),
                    e.tx.kind.to_string(),
                    if e.tx.paid { "yes".into() } else { "".into() },
                    installment_tag(&e.tx),
                    e.category_name.clone().unwrap_or_default(),
                    e.owner_name.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Id", "Billing", "Description", "Amount", "Type", "Paid", "Inst",
                    "Category", "Owner",
                ],
                rows,
            )
        );
        println!(
            "Income {}  Expense {}  Balance {}",
            fmt_money(&view.summary.total_income),
            fmt_money(&view.summary.total_expense),
            fmt_money(&view.summary.balance)
        );
    }
    Ok(())
}

/// Every group member the scope reaches, given the target on the command
/// line. A transaction outside any group acts as its own one-element group.
fn resolve_action_targets(
    store: &dyn TransactionStore,
    conn: &Connection,
    sub: &clap::ArgMatches,
) -> Result<(Vec<Transaction>, Vec<String>)> {
    let id = resolve_tx_id(conn, sub.get_one::<String>("id").unwrap())?;
    let batch_scope: BatchScope = sub.get_one::<String>("scope").unwrap().parse()?;
    let Some(target) = store.fetch_transaction(&id)? else {
        // resolve_tx_id raced with a delete; treat like a stale view
        return Ok((Vec::new(), Vec::new()));
    };
    let group = match &target.group_id {
        Some(group_id) => store.fetch_group(group_id)?,
        None => vec![target],
    };
    let ids = scope::resolve_targets(&group, &id, batch_scope);
    Ok((group, ids))
}

/// Attempt every update; report what stuck and what failed. Successes are
/// not rolled back when a later call fails.
fn apply_patches(
    store: &dyn TransactionStore,
    updates: &[(String, TransactionPatch)],
) -> (usize, Vec<String>) {
    let mut applied = 0usize;
    let mut failures = Vec::new();
    for (id, patch) in updates {
        match store.update_transaction(id, patch) {
            Ok(()) => applied += 1,
            Err(e) => {
                warn!("update of {} failed: {e:#}", id);
                failures.push(format!("{}: {e:#}", short_id(id)));
            }
        }
    }
    (applied, failures)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let patch = TransactionPatch {
        description: None, // handled per member below
        amount: sub
            .get_one::<String>("amount")
            .map(|v| parse_decimal(v))
            .transpose()?,
        category_id: sub
            .get_one::<String>("category")
            .map(|v| resolve_category_ref(conn, v))
            .transpose()?,
        owner_id: sub
            .get_one::<String>("owner")
            .map(|v| resolve_owner_ref(conn, v))
            .transpose()?,
        paid: None,
    };
    let new_description = sub
        .get_one::<String>("description")
        .map(|s| installments::strip_installment_suffix(s));
    if patch.is_empty() && new_description.is_none() {
        bail!("Nothing to edit; pass at least one of --description/--amount/--category/--owner");
    }

    let (group, ids) = resolve_action_targets(&store, conn, sub)?;
    if ids.is_empty() {
        println!("No matching installments; nothing edited.");
        return Ok(());
    }

    // The installment suffix is cosmetic: strip it from the incoming text,
    // then re-number it per member.
    let updates: Vec<(String, TransactionPatch)> = ids
        .iter()
        .map(|id| {
            let mut member_patch = patch.clone();
            if let Some(base) = &new_description {
                let member = group.iter().find(|t| &t.id == id);
                member_patch.description = Some(match member {
                    Some(t) if t.is_installment() => installments::installment_description(
                        base,
                        t.installment_current,
                        t.installment_total,
                    ),
                    _ => base.clone(),
                });
            }
            (id.clone(), member_patch)
        })
        .collect();

    let (applied, failures) = apply_patches(&store, &updates);
    if !failures.is_empty() {
        bail!(
            "Edited {} of {} installment(s); failures: {}",
            applied,
            updates.len(),
            failures.join("; ")
        );
    }
    println!("Edited {} installment(s)", applied);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let (_, ids) = resolve_action_targets(&store, conn, sub)?;
    if ids.is_empty() {
        println!("No matching installments; nothing deleted.");
        return Ok(());
    }
    let mut deleted = 0usize;
    let mut failures = Vec::new();
    for id in &ids {
        match store.delete_transaction(id) {
            Ok(()) => deleted += 1,
            Err(e) => {
                warn!("delete of {} failed: {e:#}", id);
                failures.push(format!("{}: {e:#}", short_id(id)));
            }
        }
    }
    if !failures.is_empty() {
        bail!(
            "Deleted {} of {} installment(s); failures: {}",
            deleted,
            ids.len(),
            failures.join("; ")
        );
    }
    println!("Deleted {} installment(s)", deleted);
    Ok(())
}

fn set_paid(conn: &Connection, sub: &clap::ArgMatches, paid: bool) -> Result<()> {
    let store = SqliteStore::new(conn);
    let (_, ids) = resolve_action_targets(&store, conn, sub)?;
    if ids.is_empty() {
        println!("No matching installments; nothing changed.");
        return Ok(());
    }
    let patch = TransactionPatch {
        paid: Some(paid),
        ..Default::default()
    };
    let updates: Vec<(String, TransactionPatch)> =
        ids.iter().map(|id| (id.clone(), patch.clone())).collect();
    let (applied, failures) = apply_patches(&store, &updates);
    if !failures.is_empty() {
        bail!(
            "Updated {} of {} installment(s); failures: {}",
            applied,
            updates.len(),
            failures.join("; ")
        );
    }
    println!(
        "Marked {} installment(s) {}",
        applied,
        if paid { "paid" } else { "pending" }
    );
    Ok(())
}
