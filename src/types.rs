//! Value types shared by the store, the ordering algorithms, and the selector.
//!
//! Identifiers are newtypes over `u64`. Zero is never a real identifier: a
//! `ParentId(0)` means "no gallery" and an `ItemId(0)` is the null sentinel
//! dropped by [`get_sorted_by_order`](crate::selector::OrderedCollectionSelector::get_sorted_by_order).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a single image, unique across all galleries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// The null sentinel.
    pub const NONE: ItemId = ItemId(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a gallery. Galleries are not stored entities; a gallery is
/// whatever set of items carries its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentId(pub u64);

impl ParentId {
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order value meaning "not yet placed in the sequence".
pub const UNORDERED: u32 = 0;

/// A single orderable image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Gallery the item belongs to. `None` for unattached uploads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentId>,
    /// 1-based position within the gallery, or [`UNORDERED`].
    pub order: u32,
    /// Creation time as a unix timestamp (seconds). Tie-breaker for equal orders.
    pub created_at: i64,
}

impl Item {
    pub fn is_unordered(&self) -> bool {
        self.order == UNORDERED
    }
}

/// How [`get_item_id`](crate::selector::OrderedCollectionSelector::get_item_id)
/// picks the next image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    /// Uniform draw, never repeating the previous image when there is a choice.
    #[default]
    Random,
    /// Walk forward through the order, wrapping from last to first.
    Ascending,
    /// Walk backward through the order, wrapping from first to last.
    Descending,
}

impl Selector {
    pub fn as_str(self) -> &'static str {
        match self {
            Selector::Random => "random",
            Selector::Ascending => "ascending",
            Selector::Descending => "descending",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selector {
    type Err = String;

    /// Accepts the long names plus the `asc`/`desc` shorthands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Selector::Random),
            "ascending" | "asc" => Ok(Selector::Ascending),
            "descending" | "desc" => Ok(Selector::Descending),
            other => Err(format!(
                "unknown selection mode '{other}' (expected random, ascending or descending)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ids_are_invalid() {
        assert!(!ItemId::NONE.is_valid());
        assert!(!ParentId(0).is_valid());
        assert!(ItemId(7).is_valid());
        assert!(ParentId(1).is_valid());
    }

    #[test]
    fn selector_parses_long_and_short_names() {
        assert_eq!("random".parse::<Selector>(), Ok(Selector::Random));
        assert_eq!("ASC".parse::<Selector>(), Ok(Selector::Ascending));
        assert_eq!("descending".parse::<Selector>(), Ok(Selector::Descending));
        assert!("shuffle".parse::<Selector>().is_err());
    }

    #[test]
    fn selector_serializes_lowercase() {
        let json = serde_json::to_string(&Selector::Descending).unwrap();
        assert_eq!(json, "\"descending\"");
    }

    #[test]
    fn unattached_item_omits_parent_in_json() {
        let item = Item {
            id: ItemId(3),
            parent: None,
            order: 0,
            created_at: 10,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":3,"order":0,"created_at":10}"#);
    }
}
