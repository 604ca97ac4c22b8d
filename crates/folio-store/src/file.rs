//! File-backed mirror store.
//!
//! The whole mirror lives in one JSON object on disk. Every write goes to a
//! sibling temp file first and is renamed over the original, so readers in
//! other processes see either the old or the new contents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use folio_core::{Error, MirrorStore, Result};

use crate::memory::{apply_batch, check_capacity, used_bytes};

/// Capacity-capped mirror persisted to a JSON file.
#[derive(Debug)]
pub struct FileMirror {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    capacity: usize,
}

impl FileMirror {
    /// Opens (or prepares to create) the mirror file at `path`.
    ///
    /// A missing file is an empty mirror. A file that cannot be parsed is
    /// also treated as empty, since the mirror only ever holds data that can
    /// be fetched again.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "Ignoring unreadable mirror file {}: {e}",
                        path.display()
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        log::debug!(
            "Opened mirror {} ({} keys, {} bytes)",
            path.display(),
            entries.len(),
            used_bytes(&entries)
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            capacity,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("mirror lock poisoned")))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }

        let content = serde_json::to_string(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| Error::io_with_path(e, &tmp))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| Error::io_with_path(e, &self.path))?;
        Ok(())
    }
}

impl MirrorStore for FileMirror {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        check_capacity(&entries, key, value, self.capacity)?;

        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn set_all(&self, batch: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.lock()?;
        let next = apply_batch(&entries, batch, self.capacity)?;
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
