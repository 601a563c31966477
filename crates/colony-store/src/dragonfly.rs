//! `Dragonfly` (Redis-compatible) backend.
//!
//! The whole colony state lives under a single key as one JSON document.
//!
//! | Key | Type | Description |
//! |-----|------|-------------|
//! | `colony:memory` | JSON | Serialized [`ColonyMemory`] |

use colony_types::ColonyMemory;
use fred::prelude::*;

use crate::error::StoreError;
use crate::store::StateStore;

/// Default key holding the colony document.
pub const MEMORY_KEY: &str = "colony:memory";

/// Connection handle to a `Dragonfly` instance.
#[derive(Clone)]
pub struct DragonflyStore {
    client: Client,
    key: String,
}

impl core::fmt::Debug for DragonflyStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragonflyStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl DragonflyStore {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed.
    /// Returns [`StoreError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let config = Config::from_url(url)
            .map_err(|e| StoreError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self {
            client,
            key: MEMORY_KEY.to_owned(),
        })
    }

    /// Use a different key for the colony document.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The key holding the colony document.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Delete the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Dragonfly`] if the delete fails.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _: u32 = self.client.del(self.key.as_str()).await?;
        Ok(())
    }
}

impl StateStore for DragonflyStore {
    async fn load(&self) -> Result<Option<ColonyMemory>, StoreError> {
        let value: Option<String> = self.client.get(self.key.as_str()).await?;
        value
            .map(|s| serde_json::from_str::<ColonyMemory>(&s))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn save(&self, memory: &ColonyMemory) -> Result<(), StoreError> {
        let json = serde_json::to_string(memory)?;
        let _: () = self
            .client
            .set(self.key.as_str(), json.as_str(), None, None, false)
            .await?;
        Ok(())
    }
}
