use std::sync::Arc;

use redb::Database;

use larder_core::{KeyValueStore, StorageError};

use crate::tables::KV_TABLE;

/// redb implementation of KeyValueStore.
pub struct RedbKeyValueStore {
    db: Arc<Database>,
}

impl RedbKeyValueStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let _ = write_txn
                .open_table(KV_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for RedbKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let table = read_txn
            .open_table(KV_TABLE)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        match table
            .get(key)
            .map_err(|e| StorageError::Database(e.to_string()))?
        {
            Some(value) => {
                let text = String::from_utf8(value.value().to_vec())
                    .map_err(|e| StorageError::Corrupt(e.to_string()))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;

            table
                .insert(key, value.as_bytes())
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        tracing::debug!("Persisted {} bytes under {:?}", value.len(), key);
        Ok(())
    }
}
