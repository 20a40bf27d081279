//! carrinho-core: the shopping-list data layer.
//!
//! Three collections (active list, known-item vocabulary, purchase
//! history) live in a key-value storage backend as JSON. The
//! [`PersistedStore`] is the durable source of truth; [`ListSession`] and
//! [`HistorySession`] hold per-context caches and write through on every
//! mutation. A [`ChangeBus`] carries change notices between contexts
//! sharing the same backend, so each context can reload collections it did
//! not itself just write.

pub mod event;
pub mod file_store;
pub mod history_session;
pub mod item;
pub mod list_session;
pub mod memory_store;
pub mod store;

pub use event::*;
pub use file_store::*;
pub use history_session::*;
pub use item::*;
pub use list_session::*;
pub use memory_store::*;
pub use store::*;
