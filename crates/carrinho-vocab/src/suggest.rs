//! Suggestion filter over the vocabulary.
//!
//! Matching is a case-insensitive substring test against the typed input;
//! names already on the active list are excluded so suggestions only offer
//! items the user can still add.

use std::collections::HashSet;

use crate::known::{normalize_name, KnownItem};

/// Vocabulary entries matching `input`, in vocabulary order.
///
/// Empty or whitespace-only input yields no suggestions. `taken_names`
/// holds the names currently on the active list (any casing).
pub fn suggest<'a>(
    vocabulary: &'a [KnownItem],
    input: &str,
    taken_names: &[String],
) -> Vec<&'a KnownItem> {
    let query = input.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let taken: HashSet<String> = taken_names.iter().map(|n| normalize_name(n)).collect();
    vocabulary
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .filter(|item| !taken.contains(&normalize_name(&item.name)))
        .collect()
}
