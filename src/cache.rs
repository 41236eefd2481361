//! Request-scoped memoization of ordered views.
//!
//! Every selector owns one [`ViewCache`]. Building a view means a store query
//! plus a sort, and a single command often asks for the same gallery several
//! times (count, then selection, then a move). The cache lives exactly as
//! long as its selector: it is never shared, never persisted, and never a
//! global, so a long-running process cannot serve a stale view from an
//! earlier request.
//!
//! # Views
//!
//! - **All ids** of a gallery in canonical order, keyed by [`ParentId`].
//! - **Sorted subsets**: an arbitrary id set ordered by stored order value,
//!   keyed by the deduplicated id set and the direction. Each entry remembers
//!   which galleries its ids belong to.
//!
//! # Invalidation
//!
//! [`ViewCache::invalidate`] drops the gallery's all-ids view and every
//! sorted subset that touches the gallery. Sorted subsets spanning other
//! galleries survive.

use crate::types::{ItemId, ParentId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Key of a sorted-subset view: the id set plus the direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    ids: Vec<ItemId>,
    reverse: bool,
}

impl SortKey {
    /// Build a key from a deduplicated id set.
    pub fn new(ids: &BTreeSet<ItemId>, reverse: bool) -> Self {
        Self {
            ids: ids.iter().copied().collect(),
            reverse,
        }
    }
}

#[derive(Debug, Clone)]
struct SortedView {
    parents: BTreeSet<ParentId>,
    ids: Vec<ItemId>,
}

#[derive(Debug, Default)]
pub struct ViewCache {
    all_ids: HashMap<ParentId, Vec<ItemId>>,
    sorted: HashMap<SortKey, SortedView>,
    stats: CacheStats,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_ids(&mut self, parent: ParentId) -> Option<Vec<ItemId>> {
        let hit = self.all_ids.get(&parent).cloned();
        self.stats.record(hit.is_some());
        hit
    }

    pub fn store_all_ids(&mut self, parent: ParentId, ids: Vec<ItemId>) {
        self.all_ids.insert(parent, ids);
    }

    pub fn sorted(&mut self, key: &SortKey) -> Option<Vec<ItemId>> {
        let hit = self.sorted.get(key).map(|v| v.ids.clone());
        self.stats.record(hit.is_some());
        hit
    }

    pub fn store_sorted(&mut self, key: SortKey, parents: BTreeSet<ParentId>, ids: Vec<ItemId>) {
        self.sorted.insert(key, SortedView { parents, ids });
    }

    /// Forget every view that depends on `parent`.
    pub fn invalidate(&mut self, parent: ParentId) {
        self.all_ids.remove(&parent);
        self.sorted.retain(|_, view| !view.parents.contains(&parent));
        tracing::debug!(parent = parent.0, "invalidated cached views");
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

/// Hit/miss counters for one selector's lifetime.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    fn record(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            write!(f, "no lookups")
        } else {
            write!(
                f,
                "{} cached, {} loaded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u64]) -> BTreeSet<ItemId> {
        ids.iter().map(|&i| ItemId(i)).collect()
    }

    // =========================================================================
    // All-ids views
    // =========================================================================

    #[test]
    fn all_ids_miss_then_hit() {
        let mut cache = ViewCache::new();
        assert_eq!(cache.all_ids(ParentId(1)), None);
        cache.store_all_ids(ParentId(1), vec![ItemId(2), ItemId(1)]);
        assert_eq!(cache.all_ids(ParentId(1)), Some(vec![ItemId(2), ItemId(1)]));
        assert_eq!(cache.stats(), &CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn invalidate_only_drops_that_parent() {
        let mut cache = ViewCache::new();
        cache.store_all_ids(ParentId(1), vec![ItemId(1)]);
        cache.store_all_ids(ParentId(2), vec![ItemId(2)]);
        cache.invalidate(ParentId(1));
        assert_eq!(cache.all_ids(ParentId(1)), None);
        assert_eq!(cache.all_ids(ParentId(2)), Some(vec![ItemId(2)]));
    }

    // =========================================================================
    // Sorted views
    // =========================================================================

    #[test]
    fn sort_key_distinguishes_direction() {
        let ids = set(&[1, 2]);
        assert_ne!(SortKey::new(&ids, false), SortKey::new(&ids, true));
        assert_eq!(SortKey::new(&ids, true), SortKey::new(&set(&[2, 1]), true));
    }

    #[test]
    fn invalidate_drops_sorted_views_touching_parent() {
        let mut cache = ViewCache::new();
        let mixed = SortKey::new(&set(&[1, 2]), false);
        let other = SortKey::new(&set(&[3]), false);
        cache.store_sorted(
            mixed.clone(),
            [ParentId(1), ParentId(2)].into(),
            vec![ItemId(1), ItemId(2)],
        );
        cache.store_sorted(other.clone(), [ParentId(3)].into(), vec![ItemId(3)]);

        cache.invalidate(ParentId(2));

        assert_eq!(cache.sorted(&mixed), None);
        assert_eq!(cache.sorted(&other), Some(vec![ItemId(3)]));
    }

    // =========================================================================
    // CacheStats
    // =========================================================================

    #[test]
    fn stats_display() {
        assert_eq!(CacheStats::default().to_string(), "no lookups");
        let s = CacheStats { hits: 3, misses: 2 };
        assert_eq!(s.to_string(), "3 cached, 2 loaded (5 total)");
    }
}
