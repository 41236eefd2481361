//! # Gallery Order
//!
//! Ordering and rotating selection for image galleries. Every image belongs
//! to one gallery and carries a 1-based order value; the crate keeps those
//! values dense, moves images one step at a time, and picks the next image
//! to show (random without immediate repeats, or walking the order forward
//! or backward with wraparound).
//!
//! # Architecture: Algorithm, Store, Selector
//!
//! ```text
//! selector  ──reads──▶  store (ItemStore)      items by gallery / by id
//!    │
//!    ├──calls──▶  sequence                     pure renumber / swap / cycle
//!    │
//!    └──owns───▶  cache (ViewCache)            per-request memoized views
//! ```
//!
//! The ordering logic lives in [`sequence`] as pure functions over item
//! slices that return the order writes to make. The [`selector`] loads
//! items from a [`store::ItemStore`], runs the algorithm, flushes the
//! changes, and invalidates its cache. This separation exists so the
//! invariants (dense `1..=n`, single-step swaps, wraparound) are tested
//! without any database.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `ItemId`, `ParentId`, `Item`, `Selector` |
//! | [`sequence`] | Dense renumbering, trailing placement, transposition, cyclic traversal |
//! | [`store`] | `ItemStore` trait and the in-memory store |
//! | [`sqlite`] | SQLite catalog used by the CLI |
//! | [`cache`] | Request-scoped view cache with hit/miss stats |
//! | [`selector`] | `OrderedCollectionSelector`, the public API |
//! | [`config`] | `gallery-order.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Lazy Normalization
//!
//! New images arrive with order `0` ("unordered"). Nothing places them at
//! insert time; the first read of the gallery does, appending them oldest
//! first and renumbering. Deletions leave gaps the same way, healed by the
//! next renumbering. Importers and uploaders never need to know how the
//! ordering works.
//!
//! ## Sentinels, Not Errors
//!
//! An invalid gallery, an empty gallery, a stale previous image, or a move
//! past the front are expected situations and come back as empty lists,
//! `None`, or `false`. [`selector::SelectorError`] only carries store
//! failures.
//!
//! ## No Shared Cache
//!
//! The view cache belongs to one selector instance. A long-running process
//! builds a new selector per request, so no view outlives the request that
//! computed it.

pub mod cache;
pub mod config;
pub mod output;
pub mod selector;
pub mod sequence;
pub mod sqlite;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
