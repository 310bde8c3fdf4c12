use crate::{backend::StorageBackend, error::StorageError};
use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores every key as `<directory>/<key>.json`. Writes go to a temporary
/// file in the same directory which then replaces the target, so readers
/// never see a half-written blob.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let mut file = NamedTempFile::new_in(&self.directory)?;
        file.write_all(&value)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|err| err.error)?;
        debug!(path = %path.display(), bytes = value.len(), "Stored blob");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_reads_as_none() {
        let directory = tempdir().unwrap();
        let storage = FileStorage::new(directory.path()).unwrap();
        assert_eq!(storage.get("venueBookingData").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let directory = tempdir().unwrap();
        let storage = FileStorage::new(directory.path()).unwrap();

        storage.set("venueBookingData", b"{\"a\":1}".to_vec()).unwrap();
        storage.set("venueBookingData", b"{}".to_vec()).unwrap();

        assert_eq!(storage.get("venueBookingData").unwrap(), Some(b"{}".to_vec()));
        assert!(directory.path().join("venueBookingData.json").exists());

        // only the target file is left behind, no temporaries
        let entries = fs::read_dir(directory.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_storage_persistency() {
        let directory = tempdir().unwrap();
        let storage = FileStorage::new(directory.path().join("nested")).unwrap();
        storage.set("key", b"persisted".to_vec()).unwrap();
        drop(storage);

        let storage = FileStorage::new(directory.path().join("nested")).unwrap();
        assert_eq!(storage.get("key").unwrap(), Some(b"persisted".to_vec()));
    }
}
