//! The [`StateStore`] abstraction and its in-process backend.

use colony_types::ColonyMemory;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// A key/value home for the persisted [`ColonyMemory`] document.
///
/// `load` returns `Ok(None)` until the first successful `save`.
pub trait StateStore: Send + Sync {
    /// Read the last saved state.
    fn load(&self) -> impl Future<Output = Result<Option<ColonyMemory>, StoreError>> + Send;

    /// Replace the saved state.
    fn save(&self, memory: &ColonyMemory) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// In-process store.
///
/// Holds the serialized JSON document rather than the value itself, so
/// every save/load pair goes through the same encoding as the durable
/// backends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw saved document, if any.
    pub async fn raw(&self) -> Option<String> {
        self.document.read().await.clone()
    }
}

impl StateStore for MemoryStore {
    async fn load(&self) -> Result<Option<ColonyMemory>, StoreError> {
        let guard = self.document.read().await;
        guard
            .as_deref()
            .map(serde_json::from_str::<ColonyMemory>)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn save(&self, memory: &ColonyMemory) -> Result<(), StoreError> {
        let json = serde_json::to_string(memory)?;
        *self.document.write().await = Some(json);
        Ok(())
    }
}
