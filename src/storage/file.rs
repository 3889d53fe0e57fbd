//! File-backed state store.
//!
//! All fields live in a single JSON document. Each put rewrites the document
//! and syncs it to disk; the document is loaded once at open.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::{StateStore, StoreError, StoreResult};

/// Single-file JSON store.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    fields: Mutex<Map<String, Value>>,
}

impl FileStateStore {
    /// Open a store file, loading any previously written fields.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let fields = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&contents)? {
                Value::Object(map) => map,
                other => {
                    return Err(StoreError::corrupt(
                        "<document>",
                        format!("expected object, found {}", json_type_name(&other)),
                    ))
                }
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            fields: Mutex::new(fields),
        })
    }

    /// The store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, fields: &Map<String, Value>) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(fields)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn put(&self, field: &str, value: &Value) -> StoreResult<()> {
        let mut fields = self.fields.lock().map_err(|_| StoreError::LockPoisoned)?;
        fields.insert(field.to_string(), value.clone());
        self.persist(&fields)
    }

    fn get(&self, field: &str) -> StoreResult<Option<Value>> {
        let fields = self.fields.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(fields.get(field).cloned())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
