// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, short_id};
use anyhow::Result;
use rusqlite::Connection;

/// Offline consistency scan. Nothing here mutates; every finding is a row
/// the user can chase down with `tx edit`/`tx rm`.
pub fn scan(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();

    // Installment counters out of step with grouping: a multi-part record
    // must carry a group id, and a group id implies more than one part.
    let mut stmt = conn.prepare(
        "SELECT id, installment_current, installment_total FROM transactions
         WHERE installment_total > 1 AND group_id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let current: u32 = r.get(1)?;
        let total: u32 = r.get(2)?;
        rows.push(vec![
            "ungrouped_installment".into(),
            format!("{} marked {}/{} but has no group", short_id(&id), current, total),
        ]);
    }
    let mut stmt = conn.prepare(
        "SELECT id FROM transactions WHERE group_id IS NOT NULL AND installment_total = 1",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        rows.push(vec![
            "grouped_single".into(),
            format!("{} carries a group id but is a single payment", short_id(&id)),
        ]);
    }

    // Numbering inside each group: exactly `total` members, numbered 1..=total
    // with no gaps or duplicates.
    let mut stmt = conn.prepare(
        "SELECT group_id, COUNT(*), MAX(installment_total),
                COUNT(DISTINCT installment_current),
                MIN(installment_current), MAX(installment_current)
         FROM transactions WHERE group_id IS NOT NULL GROUP BY group_id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let group_id: String = r.get(0)?;
        let members: u32 = r.get(1)?;
        let total: u32 = r.get(2)?;
        let distinct: u32 = r.get(3)?;
        let lo: u32 = r.get(4)?;
        let hi: u32 = r.get(5)?;
        if members != total || distinct != members || lo != 1 || hi != members {
            rows.push(vec![
                "broken_group_numbering".into(),
                format!(
                    "group {} has {} member(s) numbered {}..{} of {}",
                    short_id(&group_id),
                    members,
                    lo,
                    hi,
                    total
                ),
            ]);
        }
    }

    // Stored dates must name real calendar days; the monthly views refuse to
    // load a month containing the likes of 2025-02-31. SQLite's date()
    // returns NULL for those.
    for column in ["purchase_date", "billing_date"] {
        let sql = format!(
            "SELECT id, {col} FROM transactions WHERE date({col}) IS NULL",
            col = column
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: String = r.get(0)?;
            let value: String = r.get(1)?;
            rows.push(vec![
                "impossible_date".into(),
                format!("{} has {} '{}', not a calendar day", short_id(&id), column, value),
            ]);
        }
    }

    // The billing date is derived forward from the purchase date; it can
    // never land earlier.
    let mut stmt = conn.prepare(
        "SELECT id, purchase_date, billing_date FROM transactions
         WHERE billing_date < purchase_date",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let purchase: String = r.get(1)?;
        let billing: String = r.get(2)?;
        rows.push(vec![
            "billing_precedes_purchase".into(),
            format!("{} bills {} before purchase {}", short_id(&id), billing, purchase),
        ]);
    }

    // Without a card there is no cycle to shift into: a single payment must
    // bill on its purchase date.
    let mut stmt = conn.prepare(
        "SELECT id, purchase_date, billing_date FROM transactions
         WHERE card_id IS NULL AND installment_total = 1
           AND billing_date != purchase_date",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let purchase: String = r.get(1)?;
        let billing: String = r.get(2)?;
        rows.push(vec![
            "billing_drift".into(),
            format!(
                "{} has no card yet bills {} instead of {}",
                short_id(&id),
                billing,
                purchase
            ),
        ]);
    }

    // Card charges with nowhere to bill.
    let mut stmt = conn.prepare(
        "SELECT id FROM transactions WHERE method = 'credit-card' AND card_id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        rows.push(vec![
            "card_charge_without_card".into(),
            format!("{} is a credit-card charge with no card", short_id(&id)),
        ]);
    }

    // References that no longer resolve. The schema nulls these on delete,
    // but rows written before foreign keys were enforced can still dangle.
    for (column, table, issue) in [
        ("category_id", "categories", "dangling_category"),
        ("owner_id", "owners", "dangling_owner"),
        ("card_id", "cards", "dangling_card"),
    ] {
        let sql = format!(
            "SELECT t.id, t.{col} FROM transactions t
             LEFT JOIN {table} x ON t.{col}=x.id
             WHERE t.{col} IS NOT NULL AND x.id IS NULL",
            col = column,
            table = table
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: String = r.get(0)?;
            let target: i64 = r.get(1)?;
            rows.push(vec![
                issue.into(),
                format!("{} points at missing {} {}", short_id(&id), column, target),
            ]);
        }
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = scan(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
