//! JSON file backend.
//!
//! The document is written to a sibling temp file and renamed over the
//! target, so a reader never observes a half-written state.

use std::path::{Path, PathBuf};

use colony_types::ColonyMemory;
use tracing::debug;

use crate::error::StoreError;
use crate::store::StateStore;

/// Stores colony state as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by `path`. Nothing is touched until the first
    /// load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStore {
    async fn load(&self) -> Result<Option<ColonyMemory>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, memory: &ColonyMemory) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(memory)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, json.as_bytes()).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = json.len(), "Colony state written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{AgentId, AgentMemory, Job, SourceId, Task};

    use super::*;

    #[tokio::test]
    async fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("colony.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_creates_parent_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state").join("colony.json"));

        let mut memory = ColonyMemory::default();
        memory
            .job_queue
            .push(Job::new(Task::mine_energy(SourceId::new()), 30));
        let mut worker = AgentMemory::new("basicCreep");
        worker.current_job = memory.job_queue.iter().next().copied();
        memory.agents.insert(AgentId::new(), worker);

        store.save(&memory).await.unwrap();
        assert!(store.path().exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().await.unwrap(), Some(memory));
    }

    #[tokio::test]
    async fn save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("colony.json"));

        store.save(&ColonyMemory::default()).await.unwrap();
        let next = ColonyMemory {
            ran_startup_commands: true,
            ..ColonyMemory::default()
        };
        store.save(&next).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(next));
    }

    #[tokio::test]
    async fn garbage_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colony.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(path);
        assert!(matches!(
            store.load().await,
            Err(StoreError::Serialization(_))
        ));
    }
}
