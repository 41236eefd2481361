//! Pure ordering algorithms over in-memory item lists.
//!
//! Everything here works on slices of [`Item`] and returns the list of
//! [`OrderChange`]s the caller should persist. No store access, no caching.
//! The [`selector`](crate::selector) module loads items, calls into these
//! functions, and flushes the changes.
//!
//! ## Canonical order
//!
//! Items are ranked by `(order, created_at, id)`. The order value is the
//! primary key; creation time and id only break ties between equal (or
//! zero) orders, so the ranking is total and deterministic.

use crate::types::{Item, ItemId, UNORDERED};
use std::cmp::Ordering;

/// A single order write: `id` moves from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderChange {
    pub id: ItemId,
    pub from: u32,
    pub to: u32,
}

fn canonical_cmp(a: &Item, b: &Item) -> Ordering {
    a.order
        .cmp(&b.order)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

/// Sort items into canonical order (ascending).
pub fn sort_canonical(items: &mut [Item]) {
    items.sort_by(canonical_cmp);
}

/// Ids of `items` in canonical order.
pub fn ordered_ids(items: &[Item]) -> Vec<ItemId> {
    let mut sorted = items.to_vec();
    sort_canonical(&mut sorted);
    sorted.into_iter().map(|i| i.id).collect()
}

/// Renumber items to the dense sequence `1..=n` following canonical order.
///
/// Only items whose order actually changes are returned.
///
/// ```
/// # use gallery_order::sequence::renumber_dense;
/// # use gallery_order::types::{Item, ItemId, ParentId};
/// let item = |id, order| Item { id: ItemId(id), parent: Some(ParentId(1)), order, created_at: 0 };
/// // Gap between 1 and 5: only the second item is rewritten.
/// let changes = renumber_dense(&[item(1, 1), item(2, 5)]);
/// assert_eq!(changes.len(), 1);
/// assert_eq!((changes[0].id, changes[0].to), (ItemId(2), 2));
/// ```
pub fn renumber_dense(items: &[Item]) -> Vec<OrderChange> {
    let mut sorted = items.to_vec();
    sort_canonical(&mut sorted);
    sorted
        .iter()
        .zip(1u32..)
        .filter(|(item, position)| item.order != *position)
        .map(|(item, position)| OrderChange {
            id: item.id,
            from: item.order,
            to: position,
        })
        .collect()
}

/// Give every unordered item a trailing order value, oldest first.
///
/// The first unordered item gets `start`, the next `start + 1`, and so on.
/// Returns an empty list when nothing is unordered.
pub fn assign_trailing(items: &[Item], start: u32) -> Vec<OrderChange> {
    let mut unordered: Vec<&Item> = items.iter().filter(|i| i.is_unordered()).collect();
    unordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    unordered
        .into_iter()
        .zip(start..)
        .map(|(item, to)| OrderChange {
            id: item.id,
            from: UNORDERED,
            to,
        })
        .collect()
}

/// Move one item a single step by swapping order values with whatever
/// occupies the destination slot.
///
/// Returns `None` when the item is not in `items` or when the move would take
/// its order to zero. Moving past the last slot is allowed: with no occupant
/// at the destination only the moved item is rewritten, and the next dense
/// renumbering pulls it back to the end.
pub fn transpose(items: &[Item], id: ItemId, increase: bool) -> Option<Vec<OrderChange>> {
    let moved = items.iter().find(|i| i.id == id)?;
    let from = moved.order;
    let to = if increase {
        from.checked_add(1)?
    } else {
        from.checked_sub(1).filter(|&o| o != UNORDERED)?
    };

    let mut changes: Vec<OrderChange> = items
        .iter()
        .filter(|i| i.id != id && i.order == to)
        .map(|i| OrderChange {
            id: i.id,
            from: to,
            to: from,
        })
        .collect();
    changes.push(OrderChange { id, from, to });
    Some(changes)
}

/// Apply changes to an item list in place. Unknown ids are ignored.
pub fn apply_changes(items: &mut [Item], changes: &[OrderChange]) {
    for change in changes {
        if let Some(item) = items.iter_mut().find(|i| i.id == change.id) {
            item.order = change.to;
        }
    }
}

/// The item after `previous`, wrapping to the first.
///
/// With no `previous`, or a `previous` that is not in `ids`, returns the first id.
pub fn next_in_cycle(ids: &[ItemId], previous: Option<ItemId>) -> Option<ItemId> {
    let first = *ids.first()?;
    let Some(prev) = previous else {
        return Some(first);
    };
    match ids.iter().position(|&id| id == prev) {
        Some(pos) if pos + 1 < ids.len() => Some(ids[pos + 1]),
        _ => Some(first),
    }
}

/// The item before `previous`, wrapping to the last.
///
/// With no `previous`, or a `previous` that is not in `ids`, returns the last id.
pub fn previous_in_cycle(ids: &[ItemId], previous: Option<ItemId>) -> Option<ItemId> {
    let last = *ids.last()?;
    let Some(prev) = previous else {
        return Some(last);
    };
    match ids.iter().position(|&id| id == prev) {
        Some(pos) if pos > 0 => Some(ids[pos - 1]),
        _ => Some(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParentId;

    fn item(id: u64, order: u32, created_at: i64) -> Item {
        Item {
            id: ItemId(id),
            parent: Some(ParentId(1)),
            order,
            created_at,
        }
    }

    fn ids(raw: &[u64]) -> Vec<ItemId> {
        raw.iter().map(|&i| ItemId(i)).collect()
    }

    // =========================================================================
    // Canonical ordering
    // =========================================================================

    #[test]
    fn ordered_ids_breaks_ties_by_creation_then_id() {
        let items = vec![item(5, 2, 0), item(4, 1, 20), item(3, 1, 10), item(2, 1, 10)];
        assert_eq!(ordered_ids(&items), ids(&[2, 3, 4, 5]));
    }

    // =========================================================================
    // renumber_dense
    // =========================================================================

    #[test]
    fn renumber_dense_already_dense_is_empty() {
        let items = vec![item(1, 1, 0), item(2, 2, 0), item(3, 3, 0)];
        assert!(renumber_dense(&items).is_empty());
    }

    #[test]
    fn renumber_dense_closes_gaps() {
        let mut items = vec![item(1, 2, 0), item(2, 7, 0), item(3, 40, 0)];
        let changes = renumber_dense(&items);
        apply_changes(&mut items, &changes);
        let orders: Vec<u32> = items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn renumber_dense_splits_duplicates_by_creation_time() {
        let mut items = vec![item(1, 1, 50), item(2, 1, 10), item(3, 2, 0)];
        let changes = renumber_dense(&items);
        apply_changes(&mut items, &changes);
        assert_eq!(ordered_ids(&items), ids(&[2, 1, 3]));
        // Item 2 already sits at 1; only 1 and 3 move.
        let moved: Vec<ItemId> = changes.iter().map(|c| c.id).collect();
        assert_eq!(moved, ids(&[1, 3]));
    }

    #[test]
    fn renumber_dense_ranks_zero_orders_first() {
        let changes = renumber_dense(&[item(1, 1, 0), item(2, 0, 0)]);
        assert_eq!(
            changes,
            vec![
                OrderChange { id: ItemId(2), from: 0, to: 1 },
                OrderChange { id: ItemId(1), from: 1, to: 2 },
            ]
        );
    }

    #[test]
    fn renumber_dense_empty_input() {
        assert!(renumber_dense(&[]).is_empty());
    }

    // =========================================================================
    // assign_trailing
    // =========================================================================

    #[test]
    fn assign_trailing_oldest_first() {
        let items = vec![item(1, 1, 0), item(9, 0, 300), item(8, 0, 100), item(2, 2, 0)];
        let changes = assign_trailing(&items, 5);
        assert_eq!(
            changes,
            vec![
                OrderChange { id: ItemId(8), from: 0, to: 5 },
                OrderChange { id: ItemId(9), from: 0, to: 6 },
            ]
        );
    }

    #[test]
    fn assign_trailing_nothing_unordered() {
        assert!(assign_trailing(&[item(1, 1, 0)], 2).is_empty());
    }

    // =========================================================================
    // transpose
    // =========================================================================

    #[test]
    fn transpose_up_swaps_with_next() {
        let mut items = vec![item(1, 1, 0), item(2, 2, 0), item(3, 3, 0)];
        let changes = transpose(&items, ItemId(2), true).unwrap();
        apply_changes(&mut items, &changes);
        assert_eq!(ordered_ids(&items), ids(&[1, 3, 2]));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn transpose_down_swaps_with_previous() {
        let mut items = vec![item(1, 1, 0), item(2, 2, 0), item(3, 3, 0)];
        let changes = transpose(&items, ItemId(3), false).unwrap();
        apply_changes(&mut items, &changes);
        assert_eq!(ordered_ids(&items), ids(&[1, 3, 2]));
    }

    #[test]
    fn transpose_first_item_down_is_rejected() {
        let items = vec![item(1, 1, 0), item(2, 2, 0)];
        assert_eq!(transpose(&items, ItemId(1), false), None);
    }

    #[test]
    fn transpose_last_item_up_has_no_partner() {
        let items = vec![item(1, 1, 0), item(2, 2, 0)];
        let changes = transpose(&items, ItemId(2), true).unwrap();
        assert_eq!(changes, vec![OrderChange { id: ItemId(2), from: 2, to: 3 }]);
    }

    #[test]
    fn transpose_swaps_every_occupant_of_destination() {
        let items = vec![item(1, 1, 0), item(2, 2, 0), item(3, 2, 5)];
        let changes = transpose(&items, ItemId(1), true).unwrap();
        assert_eq!(changes.len(), 3);
        assert!(changes.iter().filter(|c| c.id != ItemId(1)).all(|c| c.to == 1));
    }

    #[test]
    fn transpose_unknown_item() {
        assert_eq!(transpose(&[item(1, 1, 0)], ItemId(4), true), None);
    }

    // =========================================================================
    // Cyclic traversal
    // =========================================================================

    #[test]
    fn next_in_cycle_walks_and_wraps() {
        let list = ids(&[10, 20, 30]);
        assert_eq!(next_in_cycle(&list, None), Some(ItemId(10)));
        assert_eq!(next_in_cycle(&list, Some(ItemId(10))), Some(ItemId(20)));
        assert_eq!(next_in_cycle(&list, Some(ItemId(30))), Some(ItemId(10)));
    }

    #[test]
    fn previous_in_cycle_walks_and_wraps() {
        let list = ids(&[10, 20, 30]);
        assert_eq!(previous_in_cycle(&list, None), Some(ItemId(30)));
        assert_eq!(previous_in_cycle(&list, Some(ItemId(30))), Some(ItemId(20)));
        assert_eq!(previous_in_cycle(&list, Some(ItemId(10))), Some(ItemId(30)));
    }

    #[test]
    fn stale_previous_wraps_to_the_start() {
        let list = ids(&[10, 20, 30]);
        assert_eq!(next_in_cycle(&list, Some(ItemId(99))), Some(ItemId(10)));
        assert_eq!(previous_in_cycle(&list, Some(ItemId(99))), Some(ItemId(30)));
    }

    #[test]
    fn empty_cycle_has_no_selection() {
        assert_eq!(next_in_cycle(&[], None), None);
        assert_eq!(previous_in_cycle(&[], Some(ItemId(1))), None);
    }
}
