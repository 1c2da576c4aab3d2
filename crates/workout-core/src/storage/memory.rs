//! In-memory store for tests and ephemeral sessions.

use std::collections::HashMap;

use super::StateStore;
use crate::error::StorageError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising best-effort paths.
    pub fn failing() -> Self {
        Self {
            values: HashMap::new(),
            fail_writes: true,
        }
    }

    /// Seed a raw value, bypassing any encoding.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl StateStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QueryFailed(format!("write to '{key}' rejected")));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn kv_delete(&mut self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QueryFailed(format!("delete of '{key}' rejected")));
        }
        self.values.remove(key);
        Ok(())
    }
}
