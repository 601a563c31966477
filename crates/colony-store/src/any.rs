//! Runtime-selected backend.

use colony_types::ColonyMemory;

use crate::dragonfly::DragonflyStore;
use crate::error::StoreError;
use crate::file::FileStore;
use crate::store::{MemoryStore, StateStore};

/// One of the concrete backends, chosen from configuration at startup.
#[derive(Debug)]
pub enum AnyStore {
    /// In-process, lost on exit.
    Memory(MemoryStore),
    /// JSON file on disk.
    File(FileStore),
    /// `Dragonfly` server.
    Dragonfly(DragonflyStore),
}

impl AnyStore {
    /// Short backend name for logs.
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
            Self::Dragonfly(_) => "dragonfly",
        }
    }
}

impl StateStore for AnyStore {
    async fn load(&self) -> Result<Option<ColonyMemory>, StoreError> {
        match self {
            Self::Memory(store) => store.load().await,
            Self::File(store) => store.load().await,
            Self::Dragonfly(store) => store.load().await,
        }
    }

    async fn save(&self, memory: &ColonyMemory) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.save(memory).await,
            Self::File(store) => store.save(memory).await,
            Self::Dragonfly(store) => store.save(memory).await,
        }
    }
}

impl From<MemoryStore> for AnyStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<FileStore> for AnyStore {
    fn from(store: FileStore) -> Self {
        Self::File(store)
    }
}

impl From<DragonflyStore> for AnyStore {
    fn from(store: DragonflyStore) -> Self {
        Self::Dragonfly(store)
    }
}
