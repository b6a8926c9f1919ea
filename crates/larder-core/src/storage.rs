use crate::error::StorageError;

/// Synchronous key-value persistence boundary.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// In-memory implementation for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory key-value store for testing.
    #[derive(Default)]
    pub struct InMemoryKeyValueStore {
        values: RwLock<HashMap<String, String>>,
        writes: RwLock<usize>,
    }

    impl InMemoryKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store seeded with a raw value, bypassing serialization.
        pub fn with_value(key: &str, value: &str) -> Self {
            let store = Self::new();
            store
                .values
                .write()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }

        /// Number of writes performed since creation.
        pub fn write_count(&self) -> usize {
            *self.writes.read().unwrap()
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.read().unwrap().get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values
                .write()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            *self.writes.write().unwrap() += 1;
            Ok(())
        }
    }

}
