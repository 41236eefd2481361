//! Ordering-aware selection over a gallery's images.
//!
//! [`OrderedCollectionSelector`] is the public face of the crate. It wraps an
//! [`ItemStore`], keeps a [`ViewCache`] for the duration of one request, and
//! exposes seven operations:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`get_all_ids`](OrderedCollectionSelector::get_all_ids) | Gallery ids in order, normalizing first if needed |
//! | [`get_count`](OrderedCollectionSelector::get_count) | Number of images in a gallery |
//! | [`get_item_id`](OrderedCollectionSelector::get_item_id) | Pick the next image (random / ascending / descending) |
//! | [`reorder`](OrderedCollectionSelector::reorder) | Renumber a gallery to `1..=n` |
//! | [`reorder_if_needed`](OrderedCollectionSelector::reorder_if_needed) | Place unordered images at the end, then renumber |
//! | [`get_sorted_by_order`](OrderedCollectionSelector::get_sorted_by_order) | Order an arbitrary id set by stored order |
//! | [`change_order`](OrderedCollectionSelector::change_order) | Move one image a step up or down |
//!
//! # Outcomes
//!
//! "Nothing to do" and "not applicable" are ordinary results: an invalid
//! gallery id gives an empty list, an empty gallery gives `None`, a move past
//! the front gives `false`. `Err` is reserved for store failures.
//!
//! # Scope
//!
//! Build one selector per request or command and drop it afterwards. Writes
//! made through the selector invalidate its cache; writes made to the store
//! behind its back need an explicit [`invalidate`](OrderedCollectionSelector::invalidate).
//!
//! Order mutations are read-then-write without locking. Two processes moving
//! images in the same gallery at once can leave duplicate or missing order
//! values; the next [`reorder`](OrderedCollectionSelector::reorder) heals them.

use crate::cache::{CacheStats, SortKey, ViewCache};
use crate::sequence::{self, OrderChange};
use crate::store::{ItemStore, StoreError};
use crate::types::{ItemId, ParentId, Selector};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct OrderedCollectionSelector<S, R = ThreadRng> {
    store: S,
    rng: R,
    cache: ViewCache,
}

impl<S: ItemStore> OrderedCollectionSelector<S, ThreadRng> {
    /// Selector drawing random picks from the thread-local RNG.
    pub fn new(store: S) -> Self {
        Self::with_rng(store, rand::rng())
    }
}

impl<S: ItemStore, R: Rng> OrderedCollectionSelector<S, R> {
    pub fn with_rng(store: S, rng: R) -> Self {
        Self {
            store,
            rng,
            cache: ViewCache::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access. Call [`invalidate`](Self::invalidate) after
    /// changing a gallery through it.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Drop every cached view of `parent`.
    pub fn invalidate(&mut self, parent: ParentId) {
        self.cache.invalidate(parent);
    }

    /// Every image id of the gallery in ascending order.
    ///
    /// Unordered images are placed first (see [`reorder_if_needed`](Self::reorder_if_needed)),
    /// so the result never depends on transient zero orders. An invalid
    /// gallery id yields an empty list.
    pub fn get_all_ids(&mut self, parent: ParentId) -> Result<Vec<ItemId>, SelectorError> {
        if !parent.is_valid() {
            return Ok(Vec::new());
        }
        if let Some(ids) = self.cache.all_ids(parent) {
            return Ok(ids);
        }

        self.reorder_if_needed(parent)?;
        let items = self.store.items_in(parent)?;
        let ids = sequence::ordered_ids(&items);
        tracing::debug!(parent = parent.0, count = ids.len(), "loaded gallery order");
        self.cache.store_all_ids(parent, ids.clone());
        Ok(ids)
    }

    pub fn get_count(&mut self, parent: ParentId) -> Result<usize, SelectorError> {
        Ok(self.get_all_ids(parent)?.len())
    }

    /// Pick one image from the gallery.
    ///
    /// - `Random`: uniform draw. With more than one image, never returns
    ///   `previous`; with exactly one, returns it regardless.
    /// - `Ascending`: the image after `previous`, wrapping to the first.
    /// - `Descending`: the image before `previous`, wrapping to the last.
    ///
    /// A `previous` that is not in the gallery (deleted, moved) is treated as
    /// absent from the sequence and the walk wraps.
    pub fn get_item_id(
        &mut self,
        parent: ParentId,
        selector: Selector,
        previous: Option<ItemId>,
    ) -> Result<Option<ItemId>, SelectorError> {
        let ids = self.get_all_ids(parent)?;
        if ids.is_empty() {
            return Ok(None);
        }

        if let Some(prev) = previous
            && selector != Selector::Random
            && !ids.contains(&prev)
        {
            tracing::warn!(
                parent = parent.0,
                previous = prev.0,
                "previous image is not in the gallery, wrapping"
            );
        }

        let picked = match selector {
            Selector::Random => Some(self.draw(&ids, previous)),
            Selector::Ascending => sequence::next_in_cycle(&ids, previous),
            Selector::Descending => sequence::previous_in_cycle(&ids, previous),
        };
        Ok(picked)
    }

    /// Uniform draw from a non-empty list, re-drawing while it hits `previous`.
    fn draw(&mut self, ids: &[ItemId], previous: Option<ItemId>) -> ItemId {
        if ids.len() == 1 {
            return ids[0];
        }
        loop {
            let pick = ids[self.rng.random_range(0..ids.len())];
            if Some(pick) != previous {
                return pick;
            }
        }
    }

    /// Walk the gallery `steps` times from `start`, feeding each pick back as
    /// the previous one. This is what a rotating background shows over time.
    pub fn rotation(
        &mut self,
        parent: ParentId,
        selector: Selector,
        start: Option<ItemId>,
        steps: usize,
    ) -> Result<Vec<ItemId>, SelectorError> {
        let mut shown = Vec::with_capacity(steps);
        let mut previous = start;
        for _ in 0..steps {
            match self.get_item_id(parent, selector, previous)? {
                Some(id) => {
                    shown.push(id);
                    previous = Some(id);
                }
                None => break,
            }
        }
        Ok(shown)
    }

    /// Renumber the gallery to `1..=n`, keeping the current relative order.
    ///
    /// Only images whose order changes are written. Returns how many were.
    pub fn reorder(&mut self, parent: ParentId) -> Result<usize, SelectorError> {
        if !parent.is_valid() {
            return Ok(0);
        }
        let items = self.store.items_in(parent)?;
        let changes = sequence::renumber_dense(&items);
        if !changes.is_empty() {
            self.flush(parent, &changes)?;
            tracing::info!(
                parent = parent.0,
                rewritten = changes.len(),
                total = items.len(),
                "reordered gallery"
            );
        }
        Ok(changes.len())
    }

    /// Give unordered images trailing order values (oldest first), then
    /// renumber the gallery densely.
    ///
    /// Trailing values start after the gallery's current image count. Returns
    /// `false` and touches nothing when every image already has an order.
    pub fn reorder_if_needed(&mut self, parent: ParentId) -> Result<bool, SelectorError> {
        if !parent.is_valid() {
            return Ok(false);
        }
        let items = self.store.items_in(parent)?;
        let start = u32::try_from(items.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        let changes = sequence::assign_trailing(&items, start);
        if changes.is_empty() {
            return Ok(false);
        }

        self.flush(parent, &changes)?;
        tracing::info!(
            parent = parent.0,
            placed = changes.len(),
            "placed unordered images"
        );
        self.reorder(parent)?;
        Ok(true)
    }

    /// Order an arbitrary set of image ids by their stored order value.
    ///
    /// The ids may span galleries. Null ids are dropped, duplicates collapse,
    /// and ids missing from the store are left out of the result. Ties fall
    /// back to creation time and then id.
    pub fn get_sorted_by_order(
        &mut self,
        ids: &[ItemId],
        reverse: bool,
    ) -> Result<Vec<ItemId>, SelectorError> {
        let set: BTreeSet<ItemId> = ids.iter().copied().filter(|id| id.is_valid()).collect();
        if set.is_empty() {
            return Ok(Vec::new());
        }
        let key = SortKey::new(&set, reverse);
        if let Some(sorted) = self.cache.sorted(&key) {
            return Ok(sorted);
        }

        let wanted: Vec<ItemId> = set.into_iter().collect();
        let mut items = self.store.items_by_ids(&wanted)?;
        sequence::sort_canonical(&mut items);
        if reverse {
            items.reverse();
        }
        let parents = items.iter().filter_map(|i| i.parent).collect();
        let sorted: Vec<ItemId> = items.into_iter().map(|i| i.id).collect();
        self.cache.store_sorted(key, parents, sorted.clone());
        Ok(sorted)
    }

    /// Move one image a single step, swapping with the image it lands on.
    ///
    /// `increase` moves it later in the sequence. Returns `false` when the
    /// image does not exist, belongs to no gallery, or is already first and
    /// asked to move down. Moving the last image up has no swap partner: it
    /// is written one past the end and the final renumbering puts it back,
    /// so the call succeeds without a visible change.
    pub fn change_order(&mut self, id: ItemId, increase: bool) -> Result<bool, SelectorError> {
        let Some(item) = self.store.item(id)? else {
            tracing::debug!(item = id.0, "cannot move missing image");
            return Ok(false);
        };
        let Some(parent) = item.parent.filter(|p| p.is_valid()) else {
            tracing::debug!(item = id.0, "cannot move unattached image");
            return Ok(false);
        };

        self.reorder_if_needed(parent)?;
        let items = self.store.items_in(parent)?;
        let Some(changes) = sequence::transpose(&items, id, increase) else {
            tracing::debug!(item = id.0, increase, "image is already at the front");
            return Ok(false);
        };

        self.flush(parent, &changes)?;
        self.reorder(parent)?;
        let direction = if increase { "up" } else { "down" };
        tracing::info!(item = id.0, parent = parent.0, direction, "moved image");
        Ok(true)
    }

    fn flush(&mut self, parent: ParentId, changes: &[OrderChange]) -> Result<(), SelectorError> {
        self.store.apply(changes)?;
        self.cache.invalidate(parent);
        Ok(())
    }
}
