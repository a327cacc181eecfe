// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{LedgerEntry, PaymentMethod, Transaction, TransactionKind, TransactionPatch};
use crate::utils::month_key;
use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use log::debug;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params, params_from_iter};
use rust_decimal::Decimal;

/// The persistence collaborator the core components talk to. One call per
/// record; batch operations are caller-side fan-outs of these.
pub trait TransactionStore {
    /// All records billed in the given period, with display names and colors
    /// denormalized on for the view.
    fn fetch_transactions(&self, month: u32, year: i32) -> Result<Vec<LedgerEntry>>;
    fn fetch_transaction(&self, id: &str) -> Result<Option<Transaction>>;
    /// Members of an installment group, ordered by installment number then
    /// purchase date.
    fn fetch_group(&self, group_id: &str) -> Result<Vec<Transaction>>;
    fn create_transaction(&self, tx: &Transaction) -> Result<()>;
    /// Merge the patch into the stored record. Fields the patch leaves unset
    /// are not written at all.
    fn update_transaction(&self, id: &str, patch: &TransactionPatch) -> Result<()>;
    fn delete_transaction(&self, id: &str) -> Result<()>;
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SqliteStore { conn }
    }
}

const TX_COLUMNS: &str = "t.id, t.group_id, t.description, t.amount, t.kind, t.purchase_date, \
     t.billing_date, t.paid, t.method, t.category_id, t.owner_id, t.card_id, \
     t.installment_current, t.installment_total";

fn decimal_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn tx_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind_raw: String = row.get(4)?;
    let kind: TransactionKind = kind_raw
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let method_raw: String = row.get(8)?;
    let method: PaymentMethod = method_raw
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: row.get(0)?,
        group_id: row.get(1)?,
        description: row.get(2)?,
        amount: decimal_from_row(row, 3)?,
        kind,
        purchase_date: row.get::<_, NaiveDate>(5)?,
        billing_date: row.get::<_, NaiveDate>(6)?,
        paid: row.get(7)?,
        method,
        category_id: row.get(9)?,
        owner_id: row.get(10)?,
        card_id: row.get(11)?,
        installment_current: row.get(12)?,
        installment_total: row.get(13)?,
    })
}

impl TransactionStore for SqliteStore<'_> {
    fn fetch_transactions(&self, month: u32, year: i32) -> Result<Vec<LedgerEntry>> {
        let period = month_key(month, year);
        let sql = format!(
            "SELECT {TX_COLUMNS}, c.name, c.color, o.name, k.name
             FROM transactions t
             LEFT JOIN categories c ON t.category_id = c.id
             LEFT JOIN owners o ON t.owner_id = o.id
             LEFT JOIN cards k ON t.card_id = k.id
             WHERE substr(t.billing_date, 1, 7) = ?1
             ORDER BY t.billing_date, t.created_at, t.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![period], |r| {
            let tx = tx_from_row(r)?;
            let category_name: Option<String> = r.get(14)?;
            let category_color: Option<String> = r.get(15)?;
            let owner_name: Option<String> = r.get(16)?;
            let card_name: Option<String> = r.get(17)?;
            Ok(LedgerEntry::new(
                tx,
                category_name,
                category_color,
                owner_name,
                card_name,
            ))
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        debug!("loaded {} transaction(s) for {}", entries.len(), period);
        Ok(entries)
    }

    fn fetch_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let sql = format!("SELECT {TX_COLUMNS} FROM transactions t WHERE t.id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let tx = stmt
            .query_row(params![id], tx_from_row)
            .optional()
            .with_context(|| format!("Load transaction '{}'", id))?;
        Ok(tx)
    }

    fn fetch_group(&self, group_id: &str) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM transactions t
             WHERE t.group_id = ?1
             ORDER BY t.installment_current, t.purchase_date"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![group_id], tx_from_row)?;
        let mut members = Vec::new();
        for row in rows {
            members.push(row?);
        }
        Ok(members)
    }

    fn create_transaction(&self, tx: &Transaction) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO transactions(id, group_id, description, amount, kind,
                     purchase_date, billing_date, paid, method, category_id, owner_id,
                     card_id, installment_current, installment_total)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    tx.id,
                    tx.group_id,
                    tx.description,
                    tx.amount.to_string(),
                    tx.kind.as_str(),
                    tx.purchase_date.to_string(),
                    tx.billing_date.to_string(),
                    tx.paid,
                    tx.method.as_str(),
                    tx.category_id,
                    tx.owner_id,
                    tx.card_id,
                    tx.installment_current,
                    tx.installment_total,
                ],
            )
            .with_context(|| format!("Create transaction '{}'", tx.description))?;
        debug!(
            "created transaction {} ({}/{})",
            tx.id, tx.installment_current, tx.installment_total
        );
        Ok(())
    }

    fn update_transaction(&self, id: &str, patch: &TransactionPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(description) = &patch.description {
            sets.push("description=?");
            values.push(Box::new(description.clone()));
        }
        if let Some(amount) = patch.amount {
            sets.push("amount=?");
            values.push(Box::new(amount.to_string()));
        }
        if let Some(category_id) = patch.category_id {
            sets.push("category_id=?");
            values.push(Box::new(category_id));
        }
        if let Some(owner_id) = patch.owner_id {
            sets.push("owner_id=?");
            values.push(Box::new(owner_id));
        }
        if let Some(paid) = patch.paid {
            sets.push("paid=?");
            values.push(Box::new(paid));
        }
        values.push(Box::new(id.to_string()));
        let sql = format!("UPDATE transactions SET {} WHERE id=?", sets.join(", "));
        let refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let changed = self
            .conn
            .execute(&sql, params_from_iter(refs))
            .with_context(|| format!("Update transaction '{}'", id))?;
        ensure!(changed == 1, "transaction '{}' not found", id);
        debug!("updated transaction {}", id);
        Ok(())
    }

    fn delete_transaction(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])
            .with_context(|| format!("Delete transaction '{}'", id))?;
        ensure!(changed == 1, "transaction '{}' not found", id);
        debug!("deleted transaction {}", id);
        Ok(())
    }
}
