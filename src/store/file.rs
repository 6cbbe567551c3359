//! JSON-file store.
//!
//! DESIGN
//! ======
//! The whole file is one JSON object mapping key to value. Every mutation
//! re-reads the file, applies the one changed key, and writes the result
//! through a sibling temp file and a rename. A crash mid-write leaves the
//! previous contents intact, and several handles on the same path (the auth
//! flow and the layout preferences) never erase each other's keys.
//!
//! Reads are served from the snapshot taken at open and refreshed on each
//! write, so a handle sees its own keys immediately and another handle's
//! keys after its next write or a reopen.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{KeyValueStore, StoreError};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStore {
    /// Open the store at `path`. A missing or empty file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or does
    /// not hold a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = read_entries(&path)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened session store");
        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temp file beside the store: `<file name>.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.temp_path();
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = read_entries(&self.path)?;
        entries.insert(key.to_owned(), value);
        self.write_entries(&entries)?;
        self.entries = entries;
        tracing::debug!(key, "store entry written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut entries = read_entries(&self.path)?;
        if entries.remove(key).is_none() {
            self.entries = entries;
            return Ok(());
        }
        self.write_entries(&entries)?;
        self.entries = entries;
        tracing::debug!(key, "store entry removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
