//! Local key/value store for client-side flags.
//!
//! Values are JSON-encoded id lists stored as text, one per key, in a single
//! JSON file. Lists are read and written wholesale.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Key holding the ids of inbox messages the participant has opened
pub const INBOX_READ_KEY: &str = "inbox-read";

#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| Error::SnapshotMalformed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(Error::IoRead { path, source: e }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids stored under `key`. A missing or unparsable value reads as empty.
    pub fn read_ids(&self, key: &str) -> Vec<String> {
        let Some(raw) = self.entries.get(key) else {
            return Vec::new();
        };
        match serde_json::from_str(raw) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable local store value");
                Vec::new()
            }
        }
    }

    /// Replace the list under `key` and persist
    pub fn write_ids(&mut self, key: &str, ids: &[String]) -> Result<()> {
        let raw = serde_json::to_string(ids)?;
        self.entries.insert(key.to_string(), raw);
        self.flush()
    }

    /// Add `id` to the list under `key`. Returns `false` if it was already there.
    pub fn mark_read(&mut self, key: &str, id: &str) -> Result<bool> {
        if self.is_read(key, id) {
            return Ok(false);
        }
        let mut ids = self.read_ids(key);
        ids.push(id.to_string());
        self.write_ids(key, &ids)?;
        debug!(key, id, "Marked as read");
        Ok(true)
    }

    pub fn is_read(&self, key: &str, id: &str) -> bool {
        self.read_ids(key).iter().any(|existing| existing == id)
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(|e| Error::IoWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mark_read_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.json");

        let mut store = LocalStore::open(&path).unwrap();
        assert!(store.read_ids(INBOX_READ_KEY).is_empty());
        assert!(store.mark_read(INBOX_READ_KEY, "msg-1").unwrap());
        assert!(store.mark_read(INBOX_READ_KEY, "msg-2").unwrap());
        assert!(!store.mark_read(INBOX_READ_KEY, "msg-1").unwrap());

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.read_ids(INBOX_READ_KEY), vec!["msg-1", "msg-2"]);
        assert!(reopened.is_read(INBOX_READ_KEY, "msg-2"));
        assert!(!reopened.is_read(INBOX_READ_KEY, "msg-3"));
    }

    #[test]
    fn test_write_ids_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut store = LocalStore::open(dir.path().join("local.json")).unwrap();
        store
            .write_ids("k", &["a".to_string(), "b".to_string()])
            .unwrap();
        store.write_ids("k", &["c".to_string()]).unwrap();
        assert_eq!(store.read_ids("k"), vec!["c"]);
    }

    #[test]
    fn test_bad_value_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, r#"{"inbox-read": "not a list"}"#).unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert!(store.read_ids(INBOX_READ_KEY).is_empty());
    }
}
