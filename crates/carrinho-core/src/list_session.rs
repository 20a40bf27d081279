//! Active-list session: cached list + vocabulary, write-through mutations.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use tracing::debug;

use carrinho_vocab::{normalize_name, suggest, KnownItem};

use crate::item::{HistoryItem, ShoppingItem};
use crate::store::{PersistedStore, StorageBackend, StorageKey, StoreError};

/// Glyph for items the vocabulary does not know yet.
const PLACEHOLDER_EMOJI: &str = "📦";

/// One context's view of the active list and the vocabulary.
///
/// Every mutation updates the cache and persists the whole collection in
/// the same call. Change notices from other contexts accumulate until
/// [`ListSession::sync`] drains them.
pub struct ListSession<B: StorageBackend> {
    store: Arc<PersistedStore<B>>,
    notices: Receiver<StorageKey>,
    list: Vec<ShoppingItem>,
    known: Vec<KnownItem>,
}

impl<B: StorageBackend> ListSession<B> {
    /// Subscribe to the store's change bus and load both collections.
    pub fn new(store: Arc<PersistedStore<B>>) -> Self {
        let notices = store.subscribe();
        let list = store.load_shopping_list();
        let known = store.load_known_items();
        Self {
            store,
            notices,
            list,
            known,
        }
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.list
    }

    /// The merged vocabulary (seed plus learned entries).
    pub fn known_items(&self) -> &[KnownItem] {
        &self.known
    }

    /// Vocabulary entries matching `input`, excluding names already on
    /// the list.
    pub fn suggestions(&self, input: &str) -> Vec<&KnownItem> {
        let taken: Vec<String> = self.list.iter().map(|item| item.name.clone()).collect();
        suggest(&self.known, input, &taken)
    }

    /// Add an item by name.
    ///
    /// Empty names and names already on the list (case-insensitively) are
    /// accepted as already-satisfied intent: the call is a no-op, not an
    /// error. Without an explicit emoji the glyph comes from the
    /// vocabulary, or a placeholder is assigned and the normalized name
    /// learned as a new vocabulary entry.
    pub fn add(&mut self, raw_name: &str, explicit_emoji: Option<&str>) -> Result<(), StoreError> {
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let normalized = normalize_name(trimmed);
        if self
            .list
            .iter()
            .any(|item| normalize_name(&item.name) == normalized)
        {
            return Ok(());
        }

        let emoji = match explicit_emoji {
            Some(emoji) => emoji.to_string(),
            None => self.resolve_emoji(&normalized)?,
        };

        // Persist first; the cache only advances once the write landed.
        let mut next = self.list.clone();
        next.push(ShoppingItem::new(trimmed, emoji));
        self.store.save_shopping_list(&next)?;
        self.list = next;
        Ok(())
    }

    /// Glyph for `normalized` from the vocabulary, or a placeholder. The
    /// placeholder path is the only one that grows the vocabulary.
    fn resolve_emoji(&mut self, normalized: &str) -> Result<String, StoreError> {
        if let Some(known) = self
            .known
            .iter()
            .find(|k| normalize_name(&k.name) == normalized)
        {
            return Ok(known.emoji.clone());
        }
        let mut next = self.known.clone();
        next.push(KnownItem::new(normalized, PLACEHOLDER_EMOJI));
        self.store.save_known_items(&next)?;
        self.known = next;
        Ok(PLACEHOLDER_EMOJI.to_string())
    }

    /// Remove the item with `id`, if present.
    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.list.iter().any(|item| item.id == id) {
            return Ok(());
        }
        let next: Vec<ShoppingItem> = self
            .list
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        self.store.save_shopping_list(&next)?;
        self.list = next;
        Ok(())
    }

    /// Move the item with `id` into history, stamped now.
    ///
    /// The history write lands before the item leaves the list, so a crash
    /// between the two can duplicate the record into history but never
    /// lose it from both collections.
    pub fn mark_purchased(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(item) = self.list.iter().find(|item| item.id == id) else {
            return Ok(());
        };
        let record = HistoryItem::purchased_now(item);

        let mut history = self.store.load_history();
        history.push(record);
        self.store.save_history(&history)?;

        self.remove(id)
    }

    /// Drain pending change notices and reload the named collections.
    /// Returns whether anything was reloaded.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        while let Ok(key) = self.notices.try_recv() {
            match key {
                StorageKey::List => {
                    self.list = self.store.load_shopping_list();
                    changed = true;
                }
                StorageKey::Known => {
                    self.known = self.store.load_known_items();
                    changed = true;
                }
                // History belongs to the history session
                StorageKey::History => {}
            }
        }
        if changed {
            debug!(context = %self.store.context(), "list session reloaded after remote write");
        }
        changed
    }
}
