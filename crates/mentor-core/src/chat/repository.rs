//! Store repository trait.
//!
//! Defines the interface for persisting the chat/folder tree.

use async_trait::async_trait;

use super::store::ChatStore;
use crate::error::Result;

/// An abstract repository for the persisted chat/folder tree.
///
/// This trait decouples the application's core logic from the specific
/// storage mechanism (e.g., a JSON file, a database, a browser storage
/// slot). The store is written through in full on every accepted mutation,
/// and the persisted snapshot is the sole source of truth on reload.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Loads the persisted snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(store))`: a snapshot was found and parsed
    /// - `Ok(None)`: nothing persisted yet, or the persisted payload was
    ///   unreadable (startup must never fail on corrupt local state)
    /// - `Err(_)`: storage could not be accessed at all
    async fn load(&self) -> Result<Option<ChatStore>>;

    /// Persists the full snapshot, replacing any previous one.
    async fn save(&self, store: &ChatStore) -> Result<()>;
}
