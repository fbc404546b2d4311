//! Local key/value persistence, the client's stand-in for browser local storage.

use std::{collections::HashMap, fs, io, path::PathBuf};

use serde_json::{Map, Value};
use shared::domain::EmployeeNameMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Key under which the employee name map is persisted.
pub const EMPLOYEE_NAMES_KEY: &str = "employeeNames";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write store file '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("store file '{}' is not a JSON object: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

/// String-valued storage with last-write-wins semantics and no expiry.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }
}

/// A single JSON object on disk; every write rewrites the whole file.
///
/// Values written here are strings. A value of any other JSON type left by an
/// older writer reads back as its JSON text and is replaced on the next write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<local data dir>/shiftdesk/local_storage.json`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|base| base.join("shiftdesk").join("local_storage.json"))
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key).map(|value| match value {
            Value::String(text) => text,
            other => other.to_string(),
        }))
    }

    /// Always lands the write. A file that is not a JSON object is replaced
    /// by one holding only this key.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut items = match self.read_all() {
            Ok(items) => items,
            Err(err @ StoreError::Corrupt { .. }) => {
                warn!(path = %self.path.display(), "discarding unreadable store file: {err}");
                Map::new()
            }
            Err(err) => return Err(err),
        };
        items.insert(key.to_string(), Value::String(value));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let encoded = serde_json::to_string_pretty(&items).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        fs::write(&self.path, encoded).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), key, "store item written");
        Ok(())
    }
}

pub fn save_employee_names<S: KeyValueStore + ?Sized>(
    store: &mut S,
    names: &EmployeeNameMap,
) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(names).map_err(|source| StoreError::Encode {
        key: EMPLOYEE_NAMES_KEY.to_string(),
        source,
    })?;
    store.set_item(EMPLOYEE_NAMES_KEY, encoded)
}

/// Reads the persisted name map. A value that does not decode is reported as
/// absent rather than as an error.
pub fn load_employee_names<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<EmployeeNameMap>, StoreError> {
    let Some(raw) = store.get_item(EMPLOYEE_NAMES_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Option<EmployeeNameMap>>(&raw) {
        Ok(names) => Ok(names),
        Err(err) => {
            warn!(key = EMPLOYEE_NAMES_KEY, "ignoring undecodable name map: {err}");
            Ok(None)
        }
    }
}
