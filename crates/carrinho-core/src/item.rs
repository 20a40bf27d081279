//! Active-list and history record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry on the active shopping list.
///
/// `name` keeps the casing the user typed (trimmed); uniqueness within the
/// list is enforced on the normalized form at add time. Field names
/// serialize in camelCase to match the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub added_at: DateTime<Utc>,
}

impl ShoppingItem {
    /// Create a new item with a fresh id, stamped now.
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            emoji: emoji.into(),
            added_at: Utc::now(),
        }
    }
}

/// One completed purchase. An independent record: it shares field values
/// with the shopping item it was built from, but not identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub added_at: DateTime<Utc>,
    pub purchased_at: DateTime<Utc>,
}

impl HistoryItem {
    /// Build a purchase record from a list item, stamped now.
    pub fn purchased_now(item: &ShoppingItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            emoji: item.emoji.clone(),
            added_at: item.added_at,
            purchased_at: Utc::now(),
        }
    }
}
