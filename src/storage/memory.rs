//! In-memory state store.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{StateStore, StoreError, StoreResult};

/// HashMap-backed store for tests and ephemeral engines.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    fields: RwLock<HashMap<String, Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct fields written so far.
    pub fn len(&self) -> usize {
        self.fields.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryStateStore {
    fn put(&self, field: &str, value: &Value) -> StoreResult<()> {
        let mut fields = self.fields.write().map_err(|_| StoreError::LockPoisoned)?;
        fields.insert(field.to_string(), value.clone());
        Ok(())
    }

    fn get(&self, field: &str) -> StoreResult<Option<Value>> {
        let fields = self.fields.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(fields.get(field).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_then_get() {
        let store = MemoryStateStore::new();
        store.put("voting_ended", &json!(false)).unwrap();

        assert_eq!(store.get("voting_ended").unwrap(), Some(json!(false)));
    }

    #[test]
    fn test_get_unwritten_field_is_none() {
        let store = MemoryStateStore::new();
        assert_eq!(store.get("owner").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryStateStore::new();
        store.put("total_voters_count", &json!(1)).unwrap();
        store.put("total_voters_count", &json!(2)).unwrap();

        assert_eq!(store.get("total_voters_count").unwrap(), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }
}
