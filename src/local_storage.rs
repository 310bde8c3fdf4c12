use crate::{backend::StorageBackend, error::StorageError};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

/// In-process storage. Clones share the same entries, data is gone when the
/// last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.entries()?.insert(key.to_owned(), value);
        Ok(())
    }
}
