//! Core vocabulary types.

use serde::{Deserialize, Serialize};

use crate::seed::seed_items;

/// One vocabulary entry: a recognized item name and its glyph.
///
/// Seed entries store their name lowercase already; user-learned entries
/// are stored normalized (trimmed, lowercased). Equality of names is only
/// ever decided on the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownItem {
    pub name: String,
    pub emoji: String,
}

impl KnownItem {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
        }
    }
}

/// Trim and lowercase a name for comparison. Used for equality only;
/// display names keep their original casing.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Merge saved vocabulary entries into the seed list.
///
/// The seed comes first in its original order; saved entries are appended
/// in their relative order when their normalized name is not already
/// present. Seed entries win over same-named saved entries.
pub fn merge_with_seed(saved: Vec<KnownItem>) -> Vec<KnownItem> {
    let mut merged = seed_items();
    for item in saved {
        let normalized = normalize_name(&item.name);
        if !merged.iter().any(|m| normalize_name(&m.name) == normalized) {
            merged.push(item);
        }
    }
    merged
}
