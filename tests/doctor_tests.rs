// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parcela::{commands::doctor, db, utils::short_id};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO owners(id,name) VALUES (1,'Ana')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO categories(id,name,color) VALUES (5,'Market','#112233')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO cards(id,name,owner_id,closing_day,due_day) VALUES (7,'Visa',1,15,25)",
        [],
    )
    .unwrap();
    conn
}

/// Writes a row the way an external tool would, bypassing the splitter.
fn insert_tx(conn: &Connection, id: &str, purchase: &str, billing: &str, card: Option<i64>) {
    let method = if card.is_some() { "credit-card" } else { "pix" };
    conn.execute(
        "INSERT INTO transactions(id, description, amount, kind, purchase_date, billing_date,
             paid, method, category_id, owner_id, card_id, installment_current, installment_total)
         VALUES (?1,'Couch','100.00','EXPENSE',?2,?3,0,?4,5,1,?5,1,1)",
        params![id, purchase, billing, method, card],
    )
    .unwrap();
}

#[test]
fn clean_ledger_reports_no_issues() {
    let conn = setup();
    insert_tx(&conn, "ok-pix-01", "2025-03-10", "2025-03-10", None);
    insert_tx(&conn, "ok-card-1", "2025-03-20", "2025-04-20", Some(7));

    assert!(doctor::scan(&conn).unwrap().is_empty());
}

#[test]
fn unclamped_card_billing_date_is_flagged() {
    let conn = setup();
    insert_tx(&conn, "badrow01", "2025-01-31", "2025-02-31", Some(7));

    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "impossible_date");
    assert!(rows[0][1].contains("badrow01"));
    assert!(rows[0][1].contains("billing_date '2025-02-31'"));
}

#[test]
fn unclamped_purchase_date_is_flagged() {
    let conn = setup();
    insert_tx(&conn, "badrow02", "2025-04-31", "2025-05-01", Some(7));

    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "impossible_date");
    assert!(rows[0][1].contains("purchase_date '2025-04-31'"));
}

#[test]
fn free_text_in_a_date_column_is_flagged() {
    let conn = setup();
    insert_tx(&conn, "badrow03", "2025-03-10", "soon", Some(7));

    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "impossible_date");
    assert!(rows[0][1].contains("billing_date 'soon'"));
}

#[test]
fn cardless_unclamped_row_reports_date_and_drift() {
    let conn = setup();
    insert_tx(&conn, "badrow04", "2025-01-31", "2025-02-31", None);

    let rows = doctor::scan(&conn).unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(rows.len(), 2);
    assert!(labels.contains(&"impossible_date"));
    assert!(labels.contains(&"billing_drift"));
}

#[test]
fn dangling_card_reference_is_flagged() {
    let conn = setup();
    conn.execute_batch("PRAGMA foreign_keys = OFF").unwrap();
    insert_tx(&conn, "stale-01", "2025-03-10", "2025-03-10", Some(99));

    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "dangling_card");
    assert!(rows[0][1].contains("card_id 99"));
}

#[test]
fn reported_ids_truncate_on_whole_characters() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(id, description, amount, kind, purchase_date, billing_date,
             paid, method, category_id, owner_id, installment_current, installment_total)
         VALUES ('investié-0001','Couch','100.00','EXPENSE','2025-03-10','2025-03-10',
             0,'pix',5,1,2,3)",
        [],
    )
    .unwrap();

    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "ungrouped_installment");
    assert_eq!(rows[0][1], "investié marked 2/3 but has no group");
}

#[test]
fn short_id_cuts_on_char_boundaries() {
    assert_eq!(short_id("0123456789abcdef"), "01234567");
    assert_eq!(short_id("investié-0001"), "investié");
    assert_eq!(short_id("tiny"), "tiny");
}
