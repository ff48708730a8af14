//! File-backed key-value storage, one JSON file per key.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::application::KeyValueStore;
use crate::domain::DomainError;

/// Stores each key as `<dir>/<key>.json`.
///
/// The directory is created on first write. A write goes to `<key>.json.tmp`
/// and is then renamed over the target, so readers never see a partial file.
/// There is no locking between processes.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, DomainError> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
        {
            return Err(DomainError::invalid_input(format!(
                "invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored value at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(DomainError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to move {} to {}: {}",
                tmp.display(),
                path.display(),
                e
            ))
        })?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
