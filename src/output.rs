//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what the user asked about (a gallery, an image, a
//! selection) and puts identifiers and timestamps on the same line as
//! secondary context. Positions use the same 3-digit zero-padded index as
//! the rest of the tool's listings.
//!
//! ```text
//! Gallery 3 (4 images)
//!     001 #12  added 2026-01-02 10:00:00
//!     002 #15  added 2026-01-02 10:04:31
//!     003 #11  added 2026-01-01 08:00:00
//!     004 #17  added 2026-01-03 09:12:00
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function returning `Vec<String>` so the
//! layout is unit-testable; [`print_lines`] writes them to stdout. Format
//! functions are pure: no I/O, no store access.

use crate::types::{Item, ItemId, ParentId, Selector};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: u32) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Render a unix timestamp in UTC; out-of-range values print raw.
pub fn format_timestamp(secs: i64) -> String {
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => secs.to_string(),
    }
}

fn id_list(ids: &[ItemId]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Listing
// ============================================================================

/// One line per image, in the order given. Callers list a gallery after
/// normalizing it, so every order value is a position.
pub fn format_gallery(parent: ParentId, items: &[Item]) -> Vec<String> {
    let mut lines = vec![format!("Gallery {} ({})", parent, plural(items.len(), "image"))];
    for item in items {
        lines.push(format!(
            "    {} #{}  added {}",
            format_index(item.order),
            item.id,
            format_timestamp(item.created_at)
        ));
    }
    lines
}

pub fn format_count(parent: ParentId, count: usize) -> Vec<String> {
    vec![format!("Gallery {}: {}", parent, plural(count, "image"))]
}

// ============================================================================
// Selection
// ============================================================================

pub fn format_selection(
    parent: ParentId,
    mode: Selector,
    previous: Option<ItemId>,
    picked: Option<ItemId>,
) -> Vec<String> {
    let after = previous.map(|p| format!(" after #{p}")).unwrap_or_default();
    match picked {
        Some(id) => vec![format!("#{id}  ({mode}{after})")],
        None => vec![format!("Gallery {parent} has no images")],
    }
}

/// A rotation preview: the images a background would show, in turn.
pub fn format_rotation(parent: ParentId, mode: Selector, shown: &[ItemId]) -> Vec<String> {
    if shown.is_empty() {
        return vec![format!("Gallery {parent} has no images")];
    }
    let mut lines = vec![format!(
        "Gallery {} {} rotation ({})",
        parent,
        mode,
        plural(shown.len(), "step")
    )];
    for (step, id) in (1u32..).zip(shown) {
        lines.push(format!("    {} #{}", format_index(step), id));
    }
    lines
}

pub fn format_sorted(sorted: &[ItemId], reverse: bool) -> Vec<String> {
    if sorted.is_empty() {
        return vec!["No matching images".to_string()];
    }
    let direction = if reverse { "descending" } else { "ascending" };
    vec![format!("{} ({direction})", id_list(sorted))]
}

// ============================================================================
// Mutations
// ============================================================================

pub fn format_reorder(parent: ParentId, rewritten: usize) -> Vec<String> {
    if rewritten == 0 {
        vec![format!("Gallery {parent} is already in order")]
    } else {
        vec![format!(
            "Gallery {}: renumbered {}",
            parent,
            plural(rewritten, "image")
        )]
    }
}

pub fn format_normalize(parent: ParentId, placed: bool) -> Vec<String> {
    if placed {
        vec![format!("Gallery {parent}: placed unordered images at the end")]
    } else {
        vec![format!("Gallery {parent}: nothing to place")]
    }
}

pub fn format_move(id: ItemId, increase: bool, moved: bool) -> Vec<String> {
    let direction = if increase { "later" } else { "earlier" };
    if moved {
        vec![format!("Moved #{id} {direction}")]
    } else {
        vec![format!("Cannot move #{id} {direction}")]
    }
}

pub fn format_added(parent: ParentId, ids: &[ItemId]) -> Vec<String> {
    vec![format!(
        "Added {} to gallery {}: {}",
        plural(ids.len(), "image"),
        parent,
        id_list(ids)
    )]
}

pub fn format_removed(id: ItemId, removed: bool) -> Vec<String> {
    if removed {
        vec![format!("Removed #{id}")]
    } else {
        vec![format!("No image #{id}")]
    }
}

pub fn format_attached(id: ItemId, parent: ParentId, attached: bool) -> Vec<String> {
    if attached {
        vec![format!("Attached #{id} to gallery {parent}")]
    } else {
        vec![format!("No image #{id}")]
    }
}

/// Print formatted lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
