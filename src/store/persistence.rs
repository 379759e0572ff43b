//! Sled-backed persistence for the tree snapshot.
//!
//! The snapshot lives under a single key; every save is flushed before returning.

use crate::error::StorageError;
use crate::store::StateRepository;
use crate::types::DEFAULT_STATE_KEY;
use std::path::Path;

/// Durable key/value slot in a sled database
pub struct SledStateRepository {
    db: sled::Db,
    key: String,
}

impl SledStateRepository {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path, key: impl Into<String>) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = sled::open(path)?;
        Ok(Self::from_db(db, key))
    }

    pub fn from_db(db: sled::Db, key: impl Into<String>) -> Self {
        let key = key.into();
        let key = if key.is_empty() {
            DEFAULT_STATE_KEY.to_string()
        } else {
            key
        };
        Self { db, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl StateRepository for SledStateRepository {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match self.db.get(self.key.as_bytes())? {
            Some(value) => String::from_utf8(value.to_vec())
                .map(Some)
                .map_err(|_| StorageError::InvalidEncoding {
                    key: self.key.clone(),
                }),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        self.db.insert(self.key.as_bytes(), snapshot.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.db.remove(self.key.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}
