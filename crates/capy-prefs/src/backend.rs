//! Key/value preference backends.
//!
//! Values are either plain strings or unordered string sets, the two shapes
//! the launcher has ever stored.

use crate::error::PrefsError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A single stored value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Text(String),
    Set(BTreeSet<String>),
}

/// Durable string-keyed storage.
pub trait PrefsBackend: Send + Sync {
    /// Get a string value. None if absent or stored as a set.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Get a string set value. None if absent or stored as a string.
    fn get_string_set(&self, key: &str) -> Option<BTreeSet<String>>;

    /// Whether any value is stored under `key`.
    fn contains(&self, key: &str) -> bool;

    fn put_string(&self, key: &str, value: &str) -> Result<(), PrefsError>;

    fn put_string_set(&self, key: &str, value: BTreeSet<String>) -> Result<(), PrefsError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), PrefsError>;
}

macro_rules! forward_backend {
    ($($ty:ty),*) => {$(
        impl<T: PrefsBackend + ?Sized> PrefsBackend for $ty {
            fn get_string(&self, key: &str) -> Option<String> {
                (**self).get_string(key)
            }

            fn get_string_set(&self, key: &str) -> Option<BTreeSet<String>> {
                (**self).get_string_set(key)
            }

            fn contains(&self, key: &str) -> bool {
                (**self).contains(key)
            }

            fn put_string(&self, key: &str, value: &str) -> Result<(), PrefsError> {
                (**self).put_string(key, value)
            }

            fn put_string_set(&self, key: &str, value: BTreeSet<String>) -> Result<(), PrefsError> {
                (**self).put_string_set(key, value)
            }

            fn remove(&self, key: &str) -> Result<(), PrefsError> {
                (**self).remove(key)
            }
        }
    )*};
}

forward_backend!(&T, Arc<T>);

/// In-memory preferences, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: RwLock<BTreeMap<String, PrefValue>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_values(values: BTreeMap<String, PrefValue>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    fn insert(&self, key: &str, value: PrefValue) {
        self.values.write().unwrap().insert(key.to_string(), value);
    }
}

impl PrefsBackend for MemoryPrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.read().unwrap().get(key) {
            Some(PrefValue::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn get_string_set(&self, key: &str) -> Option<BTreeSet<String>> {
        match self.values.read().unwrap().get(key) {
            Some(PrefValue::Set(set)) => Some(set.clone()),
            _ => None,
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.values.read().unwrap().contains_key(key)
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.insert(key, PrefValue::Text(value.to_string()));
        Ok(())
    }

    fn put_string_set(&self, key: &str, value: BTreeSet<String>) -> Result<(), PrefsError> {
        self.insert(key, PrefValue::Set(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.values.write().unwrap().remove(key);
        Ok(())
    }
}

/// Preferences persisted as one JSON object file.
///
/// Reads are served from memory. Every write replaces the whole file through
/// a temp file in the same directory, so a crash never leaves a torn file.
#[derive(Debug)]
pub struct JsonFilePrefs {
    path: PathBuf,
    memory: MemoryPrefs,
}

impl JsonFilePrefs {
    /// Open the preferences file at `path`.
    /// A missing or unreadable file opens as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path).unwrap_or_default();
        debug!("Opened preferences {:?} ({} keys)", path, values.len());

        Self {
            path,
            memory: MemoryPrefs::from_values(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the values and write it out. Memory is
    /// only updated once the file is replaced.
    fn commit(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, PrefValue>) -> bool,
    ) -> Result<(), PrefsError> {
        let mut values = self.memory.values.write().unwrap();
        let mut next = values.clone();
        if !change(&mut next) {
            return Ok(());
        }

        write_atomically(&self.path, &next)?;
        *values = next;
        Ok(())
    }
}

fn read_values(path: &Path) -> Option<BTreeMap<String, PrefValue>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read preferences {:?}: {}", path, e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(values) => Some(values),
        Err(e) => {
            warn!("Ignoring corrupt preferences {:?}: {}", path, e);
            None
        }
    }
}

fn write_atomically(path: &Path, values: &BTreeMap<String, PrefValue>) -> Result<(), PrefsError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let bytes = serde_json::to_vec_pretty(values)?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(&bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    // Make the rename itself durable.
    #[cfg(unix)]
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!("Failed to sync preferences directory {:?}: {}", dir, e);
    }

    Ok(())
}

impl PrefsBackend for JsonFilePrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.memory.get_string(key)
    }

    fn get_string_set(&self, key: &str) -> Option<BTreeSet<String>> {
        self.memory.get_string_set(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.memory.contains(key)
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.commit(|values| {
            values.insert(key.to_string(), PrefValue::Text(value.to_string()));
            true
        })
    }

    fn put_string_set(&self, key: &str, value: BTreeSet<String>) -> Result<(), PrefsError> {
        self.commit(|values| {
            values.insert(key.to_string(), PrefValue::Set(value));
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.commit(|values| values.remove(key).is_some())
    }
}
