// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, resolve_owner_ref};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let owner_id = resolve_owner_ref(conn, sub.get_one::<String>("owner").unwrap())?;
            let closing_day = *sub.get_one::<u32>("closing-day").unwrap();
            let due_day = *sub.get_one::<u32>("due-day").unwrap();
            conn.execute(
                "INSERT INTO cards(name, owner_id, closing_day, due_day) VALUES (?1, ?2, ?3, ?4)",
                params![name, owner_id, closing_day, due_day],
            )?;
            println!(
                "Added card '{}' (closes day {}, due day {})",
                name, closing_day, due_day
            );
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT k.id, k.name, o.name, k.closing_day, k.due_day
                 FROM cards k JOIN owners o ON k.owner_id = o.id
                 ORDER BY k.name",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, u32>(3)?,
                    r.get::<_, u32>(4)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, name, owner, closing, due) = row?;
                data.push(vec![
                    id.to_string(),
                    name,
                    owner,
                    closing.to_string(),
                    due.to_string(),
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Id", "Name", "Owner", "Closing day", "Due day"], data)
            );
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM cards WHERE name=?1", params![name])?;
            println!("Removed card '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
