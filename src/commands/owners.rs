// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Owner;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let color = sub.get_one::<String>("color").map(|s| s.trim().to_string());
            conn.execute(
                "INSERT INTO owners(name, color) VALUES (?1, ?2)",
                params![name, color],
            )?;
            println!("Added owner '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT id, name, color FROM owners ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok(Owner {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    color: r.get(2)?,
                })
            })?;
            let mut data = Vec::new();
            for row in rows {
                let o = row?;
                data.push(vec![o.id.to_string(), o.name, o.color.unwrap_or_default()]);
            }
            println!("{}", pretty_table(&["Id", "Name", "Color"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM owners WHERE name=?1", params![name])?;
            println!("Removed owner '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
