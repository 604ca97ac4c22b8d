//! Process-local mirror store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use folio_core::config::DEFAULT_MIRROR_CAPACITY;
use folio_core::{Error, MirrorStore, Result};

/// Capacity-capped in-memory mirror.
#[derive(Debug)]
pub struct MemoryMirror {
    entries: Mutex<BTreeMap<String, String>>,
    capacity: usize,
}

impl MemoryMirror {
    /// Creates an empty mirror with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MIRROR_CAPACITY)
    }

    /// Creates an empty mirror holding at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            capacity,
        }
    }

    /// Bytes currently held (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.lock().map(|entries| used_bytes(&entries)).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("mirror lock poisoned")))
    }
}

impl Default for MemoryMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorStore for MemoryMirror {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        check_capacity(&entries, key, value, self.capacity)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn set_all(&self, batch: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.lock()?;
        let next = apply_batch(&entries, batch, self.capacity)?;
        *entries = next;
        Ok(())
    }
}

/// Total bytes of keys and values.
pub(crate) fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Fails with [`Error::QuotaExceeded`] if writing `key = value` would
/// push the store over `capacity`.
pub(crate) fn check_capacity(
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    capacity: usize,
) -> Result<()> {
    let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
    let needed = used_bytes(entries) - replaced + key.len() + value.len();
    if needed > capacity {
        log::warn!("Mirror write of '{key}' rejected: {needed} > {capacity} bytes");
        return Err(Error::QuotaExceeded {
            key: key.to_string(),
            needed,
            capacity,
        });
    }
    Ok(())
}

/// The store after writing every pair in `batch`, or
/// [`Error::QuotaExceeded`] for the first key that does not fit.
pub(crate) fn apply_batch(
    entries: &BTreeMap<String, String>,
    batch: &[(&str, &str)],
    capacity: usize,
) -> Result<BTreeMap<String, String>> {
    let mut next = entries.clone();
    for (key, value) in batch {
        check_capacity(&next, key, value, capacity)?;
        next.insert(key.to_string(), value.to_string());
    }
    Ok(next)
}
