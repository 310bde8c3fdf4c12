use crate::error::StorageError;

/// Byte store the booking dataset is persisted in, addressed by key.
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
}
