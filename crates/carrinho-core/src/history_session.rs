//! Purchase-history session: cached history, write-through mutations.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use tracing::debug;

use crate::item::HistoryItem;
use crate::store::{PersistedStore, StorageBackend, StorageKey, StoreError};

/// One context's view of the purchase history.
///
/// The cache holds the read-time order (most recent purchase first).
pub struct HistorySession<B: StorageBackend> {
    store: Arc<PersistedStore<B>>,
    notices: Receiver<StorageKey>,
    history: Vec<HistoryItem>,
}

impl<B: StorageBackend> HistorySession<B> {
    /// Subscribe to the store's change bus and load the history.
    pub fn new(store: Arc<PersistedStore<B>>) -> Self {
        let notices = store.subscribe();
        let history = store.load_history();
        Self {
            store,
            notices,
            history,
        }
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    /// Drop every record. Confirmation prompts are the caller's concern;
    /// once invoked this performs the full effect.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.save_history(&[])?;
        self.history.clear();
        Ok(())
    }

    /// Remove the record with `id`, if present.
    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.history.iter().any(|record| record.id == id) {
            return Ok(());
        }
        let next: Vec<HistoryItem> = self
            .history
            .iter()
            .filter(|record| record.id != id)
            .cloned()
            .collect();
        self.store.save_history(&next)?;
        self.history = next;
        Ok(())
    }

    /// Drain pending change notices and reload on a history change.
    /// Returns whether the cache was reloaded.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        while let Ok(key) = self.notices.try_recv() {
            if key == StorageKey::History {
                self.history = self.store.load_history();
                changed = true;
            }
        }
        if changed {
            debug!(context = %self.store.context(), "history session reloaded after remote write");
        }
        changed
    }
}
