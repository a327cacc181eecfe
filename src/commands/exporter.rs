// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{month_key, parse_month};
use anyhow::{Result, bail};
use rusqlite::{Connection, params_from_iter};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let period = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;

    let mut sql = String::from(
        "SELECT t.id, t.billing_date, t.purchase_date, t.description, t.amount, t.kind,
                t.paid, t.method,
                c.name AS category, o.name AS owner, k.name AS card,
                t.installment_current, t.installment_total
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         LEFT JOIN owners o ON t.owner_id=o.id
         LEFT JOIN cards k ON t.card_id=k.id",
    );
    let mut args: Vec<String> = Vec::new();
    if let Some((month, year)) = period {
        sql.push_str(" WHERE substr(t.billing_date,1,7)=?1");
        args.push(month_key(month, year));
    }
    sql.push_str(" ORDER BY t.billing_date, t.id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), |r| {
        let current: u32 = r.get(11)?;
        let total: u32 = r.get(12)?;
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, bool>(6)?,
            r.get::<_, String>(7)?,
            r.get::<_, Option<String>>(8)?,
            r.get::<_, Option<String>>(9)?,
            r.get::<_, Option<String>>(10)?,
            format!("{}/{}", current, total),
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "billing_date",
                "purchase_date",
                "description",
                "amount",
                "kind",
                "paid",
                "method",
                "category",
                "owner",
                "card",
                "installment",
            ])?;
            for row in rows {
                let (id, bd, pd, desc, amt, kind, paid, method, cat, owner, card, inst) = row?;
                wtr.write_record([
                    id,
                    bd,
                    pd,
                    desc,
                    amt,
                    kind,
                    if paid { "true".into() } else { "false".into() },
                    method,
                    cat.unwrap_or_default(),
                    owner.unwrap_or_default(),
                    card.unwrap_or_default(),
                    inst,
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (id, bd, pd, desc, amt, kind, paid, method, cat, owner, card, inst) = row?;
                items.push(json!({
                    "id": id, "billing_date": bd, "purchase_date": pd,
                    "description": desc, "amount": amt, "kind": kind,
                    "paid": paid, "method": method, "category": cat,
                    "owner": owner, "card": card, "installment": inst
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
