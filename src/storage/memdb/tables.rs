//! Table layout and low-level row access for the in-memory engine.
//!
//! Rows are bincode-encoded under their id. Secondary indexes are either
//! unique (`key -> id`) or non-unique (`key -> bincode set of ids`).

use crate::storage::OpContext;
use crate::storage::integrity::IntegrityProbe;
use crate::models::{ItemId, StatusId};
use crate::{Error, Result};
use redb::{ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fmt::Display;

pub(super) type Table = TableDefinition<'static, &'static str, &'static [u8]>;

pub(super) const ITEMS: Table = TableDefinition::new("items");
pub(super) const ITEM_NAMES: Table = TableDefinition::new("item_names");
pub(super) const ITEMS_BY_STATUS: Table = TableDefinition::new("items_by_status");
pub(super) const STATUS: Table = TableDefinition::new("status");
pub(super) const STATUS_NAMES: Table = TableDefinition::new("status_names");
pub(super) const STATUS_BY_KIND: Table = TableDefinition::new("status_by_kind");
pub(super) const NOTES: Table = TableDefinition::new("notes");
pub(super) const NOTES_BY_ITEM: Table = TableDefinition::new("notes_by_item");
pub(super) const USERS: Table = TableDefinition::new("users");
pub(super) const USER_NAMES: Table = TableDefinition::new("user_names");

pub(super) const ALL_TABLES: [Table; 10] = [
    ITEMS,
    ITEM_NAMES,
    ITEMS_BY_STATUS,
    STATUS,
    STATUS_NAMES,
    STATUS_BY_KIND,
    NOTES,
    NOTES_BY_ITEM,
    USERS,
    USER_NAMES,
];

pub(super) fn unavailable(operation: &str, cause: impl Display) -> Error {
    Error::StoreUnavailable {
        operation: operation.to_string(),
        cause: cause.to_string(),
    }
}

pub(super) fn driver(operation: &str, cause: impl Display) -> Error {
    Error::Unrecoverable {
        operation: operation.to_string(),
        cause: cause.to_string(),
    }
}

/// Raw access shared by read and write transactions.
pub(super) trait Reader {
    fn load(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>>;
    fn scan(&self, table: Table) -> Result<Vec<(String, Vec<u8>)>>;
}

fn load_from(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> Result<Option<Vec<u8>>> {
    let bytes = table.get(key).map_err(|e| driver("get", e))?;
    Ok(bytes.map(|b| b.value().to_vec()))
}

fn scan_from(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
) -> Result<Vec<(String, Vec<u8>)>> {
    let mut out = Vec::new();
    for entry in table.iter().map_err(|e| driver("scan", e))? {
        let (key, value) = entry.map_err(|e| driver("scan", e))?;
        out.push((key.value().to_string(), value.value().to_vec()));
    }
    Ok(out)
}

impl Reader for ReadTransaction {
    fn load(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>> {
        let table = self.open_table(table).map_err(|e| driver("open_table", e))?;
        load_from(&table, key)
    }

    fn scan(&self, table: Table) -> Result<Vec<(String, Vec<u8>)>> {
        let table = self.open_table(table).map_err(|e| driver("open_table", e))?;
        scan_from(&table)
    }
}

impl Reader for WriteTransaction {
    fn load(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>> {
        let table = self.open_table(table).map_err(|e| driver("open_table", e))?;
        load_from(&table, key)
    }

    fn scan(&self, table: Table) -> Result<Vec<(String, Vec<u8>)>> {
        let table = self.open_table(table).map_err(|e| driver("open_table", e))?;
        scan_from(&table)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| driver("encode_row", e))
}

fn decode<T: DeserializeOwned>(entity: &'static str, bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| Error::InvalidData {
        entity,
        reason: e.to_string(),
    })
}

/// Loads and decodes the row stored under `key`.
pub(super) fn get_row<T: DeserializeOwned>(
    reader: &impl Reader,
    table: Table,
    entity: &'static str,
    key: &str,
) -> Result<Option<T>> {
    reader
        .load(table, key)?
        .map(|bytes| decode(entity, &bytes))
        .transpose()
}

/// Decodes every row of `table`, in key order.
pub(super) fn scan_rows<T: DeserializeOwned>(
    reader: &impl Reader,
    ctx: &OpContext,
    operation: &str,
    table: Table,
    entity: &'static str,
) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for (_, bytes) in reader.scan(table)? {
        ctx.check(operation)?;
        rows.push(decode(entity, &bytes)?);
    }
    Ok(rows)
}

/// Writes `row` under `key`, replacing any previous value.
pub(super) fn put_row<T: Serialize>(
    txn: &WriteTransaction,
    table: Table,
    key: &str,
    row: &T,
) -> Result<()> {
    let bytes = encode(row)?;
    put(txn, table, key, &bytes)
}

fn put(txn: &WriteTransaction, table: Table, key: &str, bytes: &[u8]) -> Result<()> {
    let mut table = txn.open_table(table).map_err(|e| driver("open_table", e))?;
    table.insert(key, bytes).map_err(|e| driver("insert", e))?;
    Ok(())
}

/// Removes `key`; returns whether it was present.
pub(super) fn remove(txn: &WriteTransaction, table: Table, key: &str) -> Result<bool> {
    let mut table = txn.open_table(table).map_err(|e| driver("open_table", e))?;
    let removed = table.remove(key).map_err(|e| driver("remove", e))?.is_some();
    Ok(removed)
}

/// Fails with `AlreadyExists` if `key` is present in `table`.
pub(super) fn ensure_absent(
    reader: &impl Reader,
    table: Table,
    entity: &'static str,
    key: &str,
) -> Result<()> {
    if reader.load(table, key)?.is_some() {
        return Err(Error::AlreadyExists {
            entity,
            detail: format!("id '{key}'"),
        });
    }
    Ok(())
}

/// Looks up the id a unique index maps `key` to.
pub(super) fn lookup_unique(reader: &impl Reader, table: Table, key: &str) -> Result<Option<String>> {
    reader
        .load(table, key)?
        .map(|bytes| {
            String::from_utf8(bytes).map_err(|e| Error::InvalidData {
                entity: "index",
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Maps `key` to `id` in a unique index.
///
/// Fails with `AlreadyExists` when `key` already maps to another id.
pub(super) fn claim_unique(
    txn: &WriteTransaction,
    table: Table,
    entity: &'static str,
    key: &str,
    id: &str,
) -> Result<()> {
    match lookup_unique(txn, table, key)? {
        Some(existing) if existing != id => Err(Error::AlreadyExists {
            entity,
            detail: format!("name '{key}'"),
        }),
        Some(_) => Ok(()),
        None => put(txn, table, key, id.as_bytes()),
    }
}

/// Loads the id set a non-unique index keeps under `key`.
pub(super) fn load_set(reader: &impl Reader, table: Table, key: &str) -> Result<BTreeSet<String>> {
    Ok(get_row(reader, table, "index", key)?.unwrap_or_default())
}

/// Adds `id` to the set under `key`.
pub(super) fn set_insert(txn: &WriteTransaction, table: Table, key: &str, id: &str) -> Result<()> {
    let mut ids = load_set(txn, table, key)?;
    ids.insert(id.to_string());
    put_row(txn, table, key, &ids)
}

/// Removes `id` from the set under `key`, dropping the key once empty.
pub(super) fn set_remove(txn: &WriteTransaction, table: Table, key: &str, id: &str) -> Result<()> {
    let mut ids = load_set(txn, table, key)?;
    if !ids.remove(id) {
        return Ok(());
    }
    if ids.is_empty() {
        remove(txn, table, key)?;
        Ok(())
    } else {
        put_row(txn, table, key, &ids)
    }
}

/// Integrity lookups answered from inside an open transaction.
pub(super) struct Probe<'t, R>(pub(super) &'t R);

impl<R: Reader> IntegrityProbe for Probe<'_, R> {
    fn status_exists(&self, id: &StatusId) -> Result<bool> {
        Ok(self.0.load(STATUS, id.as_str())?.is_some())
    }

    fn item_exists(&self, id: &ItemId) -> Result<bool> {
        Ok(self.0.load(ITEMS, id.as_str())?.is_some())
    }

    fn items_using_status(&self, id: &StatusId) -> Result<usize> {
        Ok(load_set(self.0, ITEMS_BY_STATUS, id.as_str())?.len())
    }
}
