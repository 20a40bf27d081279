//! Typed persistence over a raw key-value backend.
//!
//! Three collections live under three fixed keys as JSON arrays. Every
//! save is a whole-collection overwrite; every load parses defensively and
//! falls back to the empty collection on malformed data. Reads also apply
//! the collection-specific normalization: dedup for the list, seed merge
//! for the vocabulary, drop-and-sort for the history.

use std::collections::HashSet;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use carrinho_vocab::{merge_with_seed, KnownItem};

use crate::event::{ChangeBus, ContextId};
use crate::item::{HistoryItem, ShoppingItem};

/// The three persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    List,
    Known,
    History,
}

impl StorageKey {
    /// Fixed key name in the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::List => "shoppingList",
            StorageKey::Known => "knownItems",
            StorageKey::History => "shoppingHistory",
        }
    }
}

/// Errors from the persistence layer. Load paths never surface these;
/// only saves and backend construction do.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raw textual key-value persistence, shared by all contexts of one
/// storage scope.
pub trait StorageBackend: Send + Sync {
    /// Read the raw value under `key`; `None` when nothing was stored.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError>;

    /// Overwrite the raw value under `key`.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), StoreError>;
}

/// Parse a serialized collection. Exposed separately so the
/// parse-or-fallback contract is testable on its own.
pub fn parse_collection<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Permissive shape for stored list records: the dedup pass needs to see
/// records with a missing or empty id.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    emoji: String,
    #[serde(default)]
    added_at: Option<DateTime<Utc>>,
}

/// Permissive shape for stored history records: records lacking a
/// purchase stamp are dropped, not treated as corruption.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHistoryRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    emoji: String,
    #[serde(default)]
    added_at: Option<DateTime<Utc>>,
    #[serde(default)]
    purchased_at: Option<DateTime<Utc>>,
}

/// One context's handle on the durable collections.
///
/// Each handle carries its own [`ContextId`]; writes publish the changed
/// key on the bus so other contexts over the same backend can reload.
pub struct PersistedStore<B: StorageBackend> {
    backend: Arc<B>,
    bus: ChangeBus,
    context: ContextId,
}

impl<B: StorageBackend> PersistedStore<B> {
    /// Open a fresh storage scope: new bus, first context.
    pub fn new(backend: B) -> Self {
        Self::attach(Arc::new(backend), ChangeBus::new())
    }

    /// Attach another context to an existing scope (same backend, same
    /// bus). Models a second tab over the same profile.
    pub fn attach(backend: Arc<B>, bus: ChangeBus) -> Self {
        Self {
            backend,
            bus,
            context: ContextId::new_v4(),
        }
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn bus(&self) -> ChangeBus {
        self.bus.clone()
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Subscribe to change notices for keys written by other contexts.
    pub fn subscribe(&self) -> Receiver<StorageKey> {
        self.bus.subscribe(self.context)
    }

    /// Read and parse a collection, degrading to empty on anything
    /// malformed or unreadable.
    fn load_raw<T: DeserializeOwned>(&self, key: StorageKey) -> Vec<T> {
        let raw = match self.backend.get(key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "storage read failed, substituting empty");
                return Vec::new();
            }
        };
        let Some(raw) = raw else { return Vec::new() };
        match parse_collection(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "discarding malformed persisted value");
                Vec::new()
            }
        }
    }

    fn save_raw<T: Serialize>(&self, key: StorageKey, value: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)?;
        self.bus.publish(key, self.context);
        Ok(())
    }

    /// Load the active list. Records with an empty name are dropped;
    /// duplicates are dropped on a key of `id`, or `name-addedAt` when the
    /// id is empty. First occurrence wins, stored order is preserved.
    pub fn load_shopping_list(&self) -> Vec<ShoppingItem> {
        let raw: Vec<RawListRecord> = self.load_raw(StorageKey::List);
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for record in raw {
            let Some(added_at) = record.added_at else {
                warn!(key = StorageKey::List.as_str(), "dropping record without addedAt");
                continue;
            };
            if record.name.is_empty() {
                continue;
            }
            let dedup_key = if record.id.is_empty() {
                format!("{}-{}", record.name, added_at.to_rfc3339())
            } else {
                record.id.clone()
            };
            if !seen.insert(dedup_key) {
                continue;
            }
            list.push(ShoppingItem {
                id: record.id,
                name: record.name,
                emoji: record.emoji,
                added_at,
            });
        }
        list
    }

    /// Overwrite the active list with exactly `list`.
    pub fn save_shopping_list(&self, list: &[ShoppingItem]) -> Result<(), StoreError> {
        self.save_raw(StorageKey::List, list)
    }

    /// Load the vocabulary: the full seed in seed order, then saved
    /// entries whose normalized name the seed does not already cover.
    pub fn load_known_items(&self) -> Vec<KnownItem> {
        merge_with_seed(self.load_raw(StorageKey::Known))
    }

    /// Overwrite the stored vocabulary with exactly `items`. Callers pass
    /// the merged list, so a later load re-adds nothing.
    pub fn save_known_items(&self, items: &[KnownItem]) -> Result<(), StoreError> {
        self.save_raw(StorageKey::Known, items)
    }

    /// Load purchase history: records lacking `purchasedAt` are dropped,
    /// the rest sorted most-recent-first (stable, ties keep stored order).
    pub fn load_history(&self) -> Vec<HistoryItem> {
        let raw: Vec<RawHistoryRecord> = self.load_raw(StorageKey::History);
        let mut history: Vec<HistoryItem> = raw
            .into_iter()
            .filter_map(|record| {
                let purchased_at = record.purchased_at?;
                let added_at = record.added_at?;
                Some(HistoryItem {
                    id: record.id,
                    name: record.name,
                    emoji: record.emoji,
                    added_at,
                    purchased_at,
                })
            })
            .collect();
        history.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        history
    }

    /// Overwrite the stored history with exactly `history`, unsorted.
    /// Sort order is a read-time concern.
    pub fn save_history(&self, history: &[HistoryItem]) -> Result<(), StoreError> {
        self.save_raw(StorageKey::History, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryBackend;
    use carrinho_vocab::SEED_LEN;
    use chrono::TimeZone;
    use rstest::rstest;

    fn store() -> PersistedStore<MemoryBackend> {
        PersistedStore::new(MemoryBackend::new())
    }

    #[rstest]
    #[case(StorageKey::List, "shoppingList")]
    #[case(StorageKey::Known, "knownItems")]
    #[case(StorageKey::History, "shoppingHistory")]
    fn key_names_are_fixed(#[case] key: StorageKey, #[case] name: &str) {
        assert_eq!(key.as_str(), name);
    }

    #[rstest]
    #[case("not json")]
    #[case("{\"an\":\"object\"}")]
    #[case("[1,2,3]")]
    fn malformed_values_load_as_empty(#[case] raw: &str) {
        let store = store();
        for key in [StorageKey::List, StorageKey::Known, StorageKey::History] {
            store.backend().set(key, raw).unwrap();
        }
        assert!(store.load_shopping_list().is_empty());
        assert_eq!(store.load_known_items().len(), SEED_LEN);
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn missing_keys_load_as_defaults() {
        let store = store();
        assert!(store.load_shopping_list().is_empty());
        assert_eq!(store.load_known_items().len(), SEED_LEN);
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn list_round_trip() {
        let store = store();
        let list = vec![
            ShoppingItem::new("Arroz", "🍚"),
            ShoppingItem::new("Leite", "🥛"),
        ];
        store.save_shopping_list(&list).unwrap();
        assert_eq!(store.load_shopping_list(), list);
    }

    #[test]
    fn list_load_drops_duplicate_ids() {
        let store = store();
        let item = ShoppingItem::new("Café", "☕");
        let dup = item.clone();
        let raw = serde_json::to_string(&vec![item.clone(), dup]).unwrap();
        store.backend().set(StorageKey::List, &raw).unwrap();

        let loaded = store.load_shopping_list();
        assert_eq!(loaded, vec![item]);
    }

    #[test]
    fn list_load_keys_on_name_and_added_at_when_id_is_missing() {
        let store = store();
        let raw = r#"[
            {"name":"pão","emoji":"🍞","addedAt":"2024-01-01T10:00:00Z"},
            {"name":"pão","emoji":"🍞","addedAt":"2024-01-01T10:00:00Z"},
            {"name":"pão","emoji":"🍞","addedAt":"2024-01-02T10:00:00Z"}
        ]"#;
        store.backend().set(StorageKey::List, raw).unwrap();

        let loaded = store.load_shopping_list();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn list_load_drops_empty_names() {
        let store = store();
        let raw = r#"[
            {"id":"a","name":"","emoji":"❓","addedAt":"2024-01-01T10:00:00Z"},
            {"id":"b","name":"sal","emoji":"🧂","addedAt":"2024-01-01T10:00:00Z"}
        ]"#;
        store.backend().set(StorageKey::List, raw).unwrap();

        let loaded = store.load_shopping_list();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "sal");
    }

    #[test]
    fn known_items_round_trip_is_idempotent() {
        let store = store();
        let mut merged = store.load_known_items();
        merged.push(KnownItem::new("pipoca", "🍿"));
        store.save_known_items(&merged).unwrap();
        assert_eq!(store.load_known_items(), merged);
    }

    #[test]
    fn seed_wins_over_saved_entries() {
        let store = store();
        store
            .save_known_items(&[KnownItem::new("arroz", "🌾")])
            .unwrap();
        let loaded = store.load_known_items();
        let rice = loaded.iter().find(|k| k.name == "arroz").unwrap();
        assert_eq!(rice.emoji, "🍚");
        assert_eq!(loaded.len(), SEED_LEN);
    }

    #[test]
    fn history_loads_most_recent_first() {
        let store = store();
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        let records = vec![
            HistoryItem {
                id: "a".into(),
                name: "leite".into(),
                emoji: "🥛".into(),
                added_at: older,
                purchased_at: older,
            },
            HistoryItem {
                id: "b".into(),
                name: "pão".into(),
                emoji: "🍞".into(),
                added_at: older,
                purchased_at: newer,
            },
        ];
        store.save_history(&records).unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded[0].id, "b");
        assert_eq!(loaded[1].id, "a");
    }

    #[test]
    fn history_sort_is_stable_on_ties() {
        let store = store();
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let records: Vec<HistoryItem> = ["a", "b", "c"]
            .iter()
            .map(|id| HistoryItem {
                id: (*id).into(),
                name: "ovos".into(),
                emoji: "🥚".into(),
                added_at: stamp,
                purchased_at: stamp,
            })
            .collect();
        store.save_history(&records).unwrap();

        let loaded = store.load_history();
        let ids: Vec<&str> = loaded.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn history_drops_records_without_purchase_stamp() {
        let store = store();
        let raw = r#"[
            {"id":"a","name":"café","emoji":"☕","addedAt":"2024-01-01T10:00:00Z"},
            {"id":"b","name":"sal","emoji":"🧂","addedAt":"2024-01-01T10:00:00Z","purchasedAt":"2024-01-01T12:00:00Z"}
        ]"#;
        store.backend().set(StorageKey::History, raw).unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b");
    }

    #[test]
    fn saves_publish_to_other_contexts_without_echo() {
        let writer = store();
        let observer = PersistedStore::attach(writer.backend(), writer.bus());
        let writer_rx = writer.subscribe();
        let observer_rx = observer.subscribe();

        writer.save_shopping_list(&[]).unwrap();

        assert_eq!(observer_rx.try_recv(), Ok(StorageKey::List));
        assert!(writer_rx.try_recv().is_err());
    }

    #[test]
    fn parse_collection_surfaces_errors() {
        assert!(parse_collection::<KnownItem>("[").is_err());
        assert_eq!(
            parse_collection::<KnownItem>("[]").unwrap(),
            Vec::<KnownItem>::new()
        );
    }
}
