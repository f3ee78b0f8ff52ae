//! Entity merging with literal-text deduplication.

use std::collections::HashSet;

use redactlab_core::Entity;

/// Combine two entity lists.
///
/// All of `primary` is kept in order, followed by each `secondary` entity
/// whose exact `text` does not appear anywhere in `primary`. Dedup is by
/// literal string only (case-sensitive), ignoring category and ranges.
pub fn merge(primary: Vec<Entity>, secondary: Vec<Entity>) -> Vec<Entity> {
    let seen: HashSet<String> = primary.iter().map(|e| e.text.clone()).collect();

    let mut merged = primary;
    merged.extend(
        secondary
            .into_iter()
            .filter(|entity| !seen.contains(&entity.text)),
    );
    merged
}
