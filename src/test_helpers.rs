//! Shared test utilities for the gallery-order test suite.
//!
//! Provides gallery fixtures, a write-recording store, and order assertions
//! that work with [`MemoryStore`] and any [`ItemStore`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (store, ids) = gallery(&[1, 2, 3]);
//! let mut selector = seeded(store);
//! selector.reorder(GALLERY).unwrap();
//! assert_dense(selector.store(), GALLERY);
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::selector::OrderedCollectionSelector;
use crate::store::{ItemStore, MemoryStore, StoreError};
use crate::types::{Item, ItemId, ParentId};

/// The gallery every fixture is built in.
pub const GALLERY: ParentId = ParentId(1);

// =========================================================================
// Fixture setup
// =========================================================================

/// A store holding one gallery whose items carry the given order values.
///
/// Items are created in slice order with `created_at` equal to their index,
/// so creation time follows the slice. Returns the ids in slice order.
pub fn gallery(orders: &[u32]) -> (MemoryStore, Vec<ItemId>) {
    let mut store = MemoryStore::new();
    let ids = orders
        .iter()
        .enumerate()
        .map(|(i, &order)| store.insert_with_order(Some(GALLERY), order, i as i64))
        .collect();
    (store, ids)
}

/// A selector with a fixed RNG seed so random selection is reproducible.
pub fn seeded<S: ItemStore>(store: S) -> OrderedCollectionSelector<S, StdRng> {
    OrderedCollectionSelector::with_rng(store, StdRng::seed_from_u64(7))
}

/// Store wrapper that records every order write.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub writes: Vec<(ItemId, u32)>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            writes: Vec::new(),
        }
    }
}

impl ItemStore for RecordingStore {
    fn items_in(&self, parent: ParentId) -> Result<Vec<Item>, StoreError> {
        self.inner.items_in(parent)
    }

    fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        self.inner.item(id)
    }

    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, StoreError> {
        self.inner.items_by_ids(ids)
    }

    fn set_order(&mut self, id: ItemId, order: u32) -> Result<(), StoreError> {
        self.writes.push((id, order));
        self.inner.set_order(id, order)
    }
}

// =========================================================================
// Order lookups
// =========================================================================

/// Stored order value of one item. Panics if the item is missing.
pub fn order_of<S: ItemStore>(store: &S, id: ItemId) -> u32 {
    store
        .item(id)
        .unwrap()
        .unwrap_or_else(|| panic!("item {id} not found"))
        .order
}

/// Stored order values of `ids`, in the same sequence.
pub fn orders_of<S: ItemStore>(store: &S, ids: &[ItemId]) -> Vec<u32> {
    ids.iter().map(|&id| order_of(store, id)).collect()
}

/// Assert the gallery's order values are exactly `1..=n`.
pub fn assert_dense<S: ItemStore>(store: &S, parent: ParentId) {
    let mut orders: Vec<u32> = store
        .items_in(parent)
        .unwrap()
        .iter()
        .map(|i| i.order)
        .collect();
    orders.sort_unstable();
    let expected: Vec<u32> = (1..=orders.len() as u32).collect();
    assert_eq!(orders, expected, "gallery {parent} is not densely ordered");
}
