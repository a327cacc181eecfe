// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CreditCard;
use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse a `YYYY-MM` month selector into (month, year).
pub fn parse_month(s: &str) -> Result<(u32, i32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((date.month(), date.year()))
}

/// The month the ledger opens on when none is asked for.
pub fn current_period() -> (u32, i32) {
    let today = chrono::Utc::now().date_naive();
    (today.month(), today.year())
}

pub fn month_key(month: u32, year: i32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Leading slice of a transaction id for table display. Cuts after eight
/// characters, never inside one.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Expand a full id or unique prefix into the stored transaction id.
pub fn resolve_tx_id(conn: &Connection, id_or_prefix: &str) -> Result<String> {
    let needle = id_or_prefix.trim();
    let exact: Option<String> = conn
        .query_row(
            "SELECT id FROM transactions WHERE id=?1",
            params![needle],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(id) = exact {
        return Ok(id);
    }
    let mut stmt =
        conn.prepare("SELECT id FROM transactions WHERE id LIKE ?1 || '%' LIMIT 2")?;
    let mut matches: Vec<String> = Vec::new();
    let rows = stmt.query_map(params![needle], |r| r.get::<_, String>(0))?;
    for row in rows {
        matches.push(row?);
    }
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!("Transaction '{}' not found", id_or_prefix),
        _ => bail!("Transaction id prefix '{}' is ambiguous", id_or_prefix),
    }
}

/// Two-step reference lookup, id match first, display-name match second.
/// The name fallback is a compatibility shim; ids are what get stored.
fn resolve_ref(conn: &Connection, table: &str, value: &str, what: &str) -> Result<i64> {
    let needle = value.trim();
    if let Ok(id) = needle.parse::<i64>() {
        let sql = format!("SELECT id FROM {} WHERE id=?1", table);
        let found: Option<i64> = conn
            .query_row(&sql, params![id], |r| r.get(0))
            .optional()?;
        if let Some(id) = found {
            return Ok(id);
        }
    }
    let sql = format!("SELECT id FROM {} WHERE name=?1", table);
    conn.query_row(&sql, params![needle], |r| r.get(0))
        .with_context(|| format!("{} '{}' not found", what, value))
}

pub fn resolve_category_ref(conn: &Connection, value: &str) -> Result<i64> {
    resolve_ref(conn, "categories", value, "Category")
}

pub fn resolve_owner_ref(conn: &Connection, value: &str) -> Result<i64> {
    resolve_ref(conn, "owners", value, "Owner")
}

/// Load a credit card by id or name; the splitter needs its closing day.
pub fn card_by_ref(conn: &Connection, value: &str) -> Result<CreditCard> {
    let id = resolve_ref(conn, "cards", value, "Card")?;
    conn.query_row(
        "SELECT id, name, owner_id, closing_day, due_day FROM cards WHERE id=?1",
        params![id],
        |r| {
            Ok(CreditCard {
                id: r.get(0)?,
                name: r.get(1)?,
                owner_id: r.get(2)?,
                closing_day: r.get(3)?,
                due_day: r.get(4)?,
            })
        },
    )
    .with_context(|| format!("Card '{}' not found", value))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
