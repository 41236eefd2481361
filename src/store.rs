//! Item store trait and the in-memory implementation.
//!
//! The [`ItemStore`] trait is the only way the selector touches persisted
//! data: read the items of a gallery, read items by id, and write an item's
//! order field. Everything ordering-related (sorting, renumbering, swapping)
//! happens in [`sequence`](crate::sequence) on plain vectors, so a store only
//! needs to answer simple lookups.
//!
//! Two implementations ship with the crate:
//!
//! | Store | Use |
//! |-------|-----|
//! | [`MemoryStore`] | Tests and embedding, no persistence |
//! | [`SqliteStore`](crate::sqlite::SqliteStore) | The CLI's on-disk catalog |

use crate::sequence::OrderChange;
use crate::types::{Item, ItemId, ParentId, UNORDERED};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// Persistent item storage consumed by the selector.
pub trait ItemStore {
    /// All items attached to `parent`, in any order.
    fn items_in(&self, parent: ParentId) -> Result<Vec<Item>, StoreError>;

    /// A single item by id, `None` if it does not exist.
    fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// The existing items among `ids`, in any order. Missing ids are skipped.
    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, StoreError>;

    /// Overwrite one item's order value.
    fn set_order(&mut self, id: ItemId, order: u32) -> Result<(), StoreError>;

    /// Persist a batch of order changes.
    fn apply(&mut self, changes: &[OrderChange]) -> Result<(), StoreError> {
        for change in changes {
            self.set_order(change.id, change.to)?;
        }
        Ok(())
    }
}

/// Non-persistent store keeping items in a `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<ItemId, Item>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new unordered item under `parent`.
    pub fn insert(&mut self, parent: Option<ParentId>, created_at: i64) -> ItemId {
        self.insert_with_order(parent, UNORDERED, created_at)
    }

    /// Add an item with an explicit order value (for seeding existing galleries).
    pub fn insert_with_order(
        &mut self,
        parent: Option<ParentId>,
        order: u32,
        created_at: i64,
    ) -> ItemId {
        self.next_id += 1;
        let id = ItemId(self.next_id);
        self.items.insert(
            id,
            Item {
                id,
                parent,
                order,
                created_at,
            },
        );
        id
    }

    /// Delete an item. Returns whether it existed.
    pub fn remove(&mut self, id: ItemId) -> bool {
        self.items.remove(&id).is_some()
    }

    /// Move an item to another gallery. Its order resets to unordered so the
    /// target gallery places it at the end on the next normalization.
    pub fn attach(&mut self, id: ItemId, parent: ParentId) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.parent = Some(parent);
                item.order = UNORDERED;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemStore for MemoryStore {
    fn items_in(&self, parent: ParentId) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .items
            .values()
            .filter(|i| i.parent == Some(parent))
            .cloned()
            .collect())
    }

    fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.items.get(&id).cloned())
    }

    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .cloned()
            .collect())
    }

    fn set_order(&mut self, id: ItemId, order: u32) -> Result<(), StoreError> {
        if let Some(item) = self.items.get_mut(&id) {
            item.order = order;
        }
        Ok(())
    }
}
