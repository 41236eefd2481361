//! SQLite-backed item store.
//!
//! One table holds every image of every gallery:
//!
//! ```text
//! items
//! ├── id          INTEGER PRIMARY KEY AUTOINCREMENT
//! ├── parent_id   INTEGER NULL         (NULL = unattached)
//! ├── item_order  INTEGER NOT NULL     (0 = unordered)
//! └── created_at  INTEGER NOT NULL     (unix seconds)
//! ```
//!
//! Queries return rows in `item_order, created_at, id` order for stable
//! output, but callers must not rely on it: the selector re-sorts everything
//! through [`sequence`](crate::sequence).

use crate::sequence::OrderChange;
use crate::store::{ItemStore, StoreError};
use crate::types::{Item, ItemId, ParentId, UNORDERED};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT id, parent_id, item_order, created_at FROM items";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a catalog file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened item store");
        Self::with_connection(conn)
    }

    /// A throwaway database, for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS items (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id   INTEGER,
                item_order  INTEGER NOT NULL DEFAULT 0,
                created_at  INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_items_parent_order
                ON items(parent_id, item_order);",
        )?;
        Ok(())
    }

    /// Add a new unordered item and return its id.
    pub fn insert(&self, parent: Option<ParentId>, created_at: i64) -> Result<ItemId, StoreError> {
        let parent = parent.map(|p| to_sql_id(p.0)).transpose()?;
        self.conn.execute(
            "INSERT INTO items (parent_id, item_order, created_at) VALUES (?1, ?2, ?3)",
            params![parent, UNORDERED, created_at],
        )?;
        let id = from_sql_id(self.conn.last_insert_rowid())?;
        tracing::info!(item = id, parent = ?parent, "created item");
        Ok(ItemId(id))
    }

    /// Delete an item. Returns whether a row was removed.
    pub fn remove(&self, id: ItemId) -> Result<bool, StoreError> {
        let Some(raw) = sql_key(id.0) else {
            return Ok(false);
        };
        let removed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1", params![raw])?;
        if removed > 0 {
            tracing::info!(item = id.0, "removed item");
        }
        Ok(removed > 0)
    }

    /// Move an item to another gallery, resetting its order to unordered.
    pub fn attach(&self, id: ItemId, parent: ParentId) -> Result<bool, StoreError> {
        let (Some(raw_id), Some(raw_parent)) = (sql_key(id.0), sql_key(parent.0)) else {
            return Ok(false);
        };
        let updated = self.conn.execute(
            "UPDATE items SET parent_id = ?1, item_order = ?2 WHERE id = ?3",
            params![raw_parent, UNORDERED, raw_id],
        )?;
        if updated > 0 {
            tracing::info!(item = id.0, parent = parent.0, "attached item");
        }
        Ok(updated > 0)
    }

    fn query_items(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Item>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, read_row)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row??);
        }
        Ok(items)
    }
}

impl ItemStore for SqliteStore {
    fn items_in(&self, parent: ParentId) -> Result<Vec<Item>, StoreError> {
        let Some(raw) = sql_key(parent.0) else {
            return Ok(Vec::new());
        };
        self.query_items(
            &format!(
                "{SELECT_COLUMNS} WHERE parent_id = ?1 ORDER BY item_order ASC, created_at ASC, id ASC"
            ),
            params![raw],
        )
    }

    fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let Some(raw) = sql_key(id.0) else {
            return Ok(None);
        };
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![raw],
                read_row,
            )
            .optional()?;
        row.transpose()
    }

    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, StoreError> {
        let raw: Vec<i64> = ids.iter().filter_map(|id| sql_key(id.0)).collect();
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; raw.len()].join(", ");
        self.query_items(
            &format!("{SELECT_COLUMNS} WHERE id IN ({placeholders}) ORDER BY item_order ASC, id ASC"),
            rusqlite::params_from_iter(raw),
        )
    }

    fn set_order(&mut self, id: ItemId, order: u32) -> Result<(), StoreError> {
        let Some(raw) = sql_key(id.0) else {
            return Ok(());
        };
        self.conn.execute(
            "UPDATE items SET item_order = ?1 WHERE id = ?2",
            params![order, raw],
        )?;
        Ok(())
    }

    /// Writes the whole batch in one transaction.
    fn apply(&mut self, changes: &[OrderChange]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE items SET item_order = ?1 WHERE id = ?2")?;
            for change in changes {
                if let Some(raw) = sql_key(change.id.0) {
                    stmt.execute(params![change.to, raw])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Map a row to an item. The outer `Result` is rusqlite's; the inner one
/// carries range checks on the stored integers.
fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<Item, StoreError>> {
    let id: i64 = row.get(0)?;
    let parent: Option<i64> = row.get(1)?;
    let order: i64 = row.get(2)?;
    let created_at: i64 = row.get(3)?;
    Ok(build_item(id, parent, order, created_at))
}

fn build_item(
    id: i64,
    parent: Option<i64>,
    order: i64,
    created_at: i64,
) -> Result<Item, StoreError> {
    let order = u32::try_from(order)
        .map_err(|_| StoreError::InvalidData(format!("item {id} has order {order}")))?;
    Ok(Item {
        id: ItemId(from_sql_id(id)?),
        parent: parent.map(from_sql_id).transpose()?.map(ParentId),
        order,
        created_at,
    })
}

/// A lookup key for an id. Ids past `i64::MAX` can never be stored, so
/// lookups treat them as absent.
fn sql_key(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn to_sql_id(id: u64) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(|_| StoreError::InvalidData(format!("id {id} out of range")))
}

fn from_sql_id(id: i64) -> Result<u64, StoreError> {
    u64::try_from(id).map_err(|_| StoreError::InvalidData(format!("negative id {id}")))
}
