//! In-memory key-value storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::KeyValueStore;
use crate::domain::DomainError;

/// In-memory key-value storage for testing and throwaway sessions.
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` with a raw value, bypassing any serialization.
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.lock().await.insert(key.into(), value.into());
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let values = self.values.lock().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut values = self.values.lock().await;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
