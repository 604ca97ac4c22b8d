#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cached;
pub mod file;
pub mod memory;

use std::sync::Arc;

use folio_core::config::MirrorConfig;
use folio_core::{MirrorStore, Result};

pub use cached::{CERTIFICATES_KEY, CachedList, PROJECTS_KEY};
pub use file::FileMirror;
pub use memory::MemoryMirror;

/// Create a mirror store based on configuration.
///
/// Selection logic:
/// 1. If `mirror.path` is set → `FileMirror`
/// 2. Otherwise → `MemoryMirror`
pub fn open_mirror(config: &MirrorConfig) -> Result<Arc<dyn MirrorStore>> {
    match config.path {
        Some(ref path) => {
            log::info!("Using file mirror at {}", path.display());
            Ok(Arc::new(FileMirror::open(path, config.capacity_bytes)?))
        }
        None => {
            log::info!("Using in-memory mirror");
            Ok(Arc::new(MemoryMirror::with_capacity(config.capacity_bytes)))
        }
    }
}
