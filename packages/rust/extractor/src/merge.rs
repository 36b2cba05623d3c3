//! Collapsing duplicate records of the same dish.

use std::collections::HashMap;

use menucat_shared::MenuItem;

/// Combine two records sharing an identity key.
///
/// The record with the strictly longer description is kept whole, except
/// that a known veg status is never lost.
pub fn merge_records(existing: MenuItem, incoming: MenuItem) -> MenuItem {
    let veg_status = existing.veg_status.merge(incoming.veg_status);
    let mut kept = if incoming.description.chars().count() > existing.description.chars().count() {
        incoming
    } else {
        existing
    };
    kept.veg_status = veg_status;
    kept
}

/// Deduplicate `items` by `(name, price)`, keeping first-seen positions.
///
/// Returns the surviving items and how many records were folded away.
pub fn dedup_items(items: Vec<MenuItem>) -> (Vec<MenuItem>, usize) {
    let mut positions = HashMap::new();
    let mut kept: Vec<MenuItem> = Vec::with_capacity(items.len());
    let mut merged = 0;

    for item in items {
        let key = item.key();
        match positions.get(&key) {
            Some(&at) => {
                let existing = std::mem::replace(&mut kept[at], MenuItem::new("", ""));
                kept[at] = merge_records(existing, item);
                merged += 1;
            }
            None => {
                positions.insert(key, kept.len());
                kept.push(item);
            }
        }
    }

    (kept, merged)
}
