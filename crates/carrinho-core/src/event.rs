//! Cross-context change notifications.
//!
//! Contexts sharing one storage backend (think: browser tabs over the same
//! profile) learn of each other's writes through the bus. The writer names
//! the key it changed; every subscriber registered under a different
//! context id receives the notice. The writer itself is never echoed — it
//! already updated its own cache at write time.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::store::StorageKey;

/// Identifies one context (one store handle and its sessions).
pub type ContextId = Uuid;

struct Subscriber {
    context: ContextId,
    tx: Sender<StorageKey>,
}

/// Multi-subscriber change bus over a shared storage scope.
///
/// Cloning yields another handle to the same bus.
#[derive(Clone)]
pub struct ChangeBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a subscriber under `context` and return its notice channel.
    pub fn subscribe(&self, context: ContextId) -> Receiver<StorageKey> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Subscriber { context, tx });
        }
        rx
    }

    /// Notify every subscriber except those registered under `origin`.
    /// Subscribers whose receiver is gone are pruned.
    pub fn publish(&self, key: StorageKey, origin: ContextId) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|s| s.context == origin || s.tx.send(key).is_ok());
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}
