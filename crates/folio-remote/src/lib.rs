#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod http;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use folio_core::config::{RemoteConfig, RemoteKind};
use folio_core::{RemoteCollections, Result};

pub use http::HttpCollections;
pub use memory::{MemoryCollections, Operation};

/// Create a remote collection client based on configuration.
///
/// Selection logic:
/// 1. `kind = "http"` → `HttpCollections` against `base_url`
/// 2. `kind = "memory"` with `seed_path` → seeded `MemoryCollections`
/// 3. Otherwise → empty `MemoryCollections`
pub fn create_remote(config: &RemoteConfig) -> Result<Arc<dyn RemoteCollections>> {
    match config.kind {
        RemoteKind::Http => {
            tracing::info!(base_url = %config.base_url, "Using REST remote collections");
            Ok(Arc::new(
                HttpCollections::new(config.base_url.clone())
                    .with_api_key(config.api_key.clone())
                    .with_poll_interval(Duration::from_millis(config.poll_interval_ms)),
            ))
        }
        RemoteKind::Memory => match config.seed_path {
            Some(ref path) => Ok(Arc::new(MemoryCollections::from_seed_file(path)?)),
            None => {
                tracing::info!("Using empty in-memory remote collections");
                Ok(Arc::new(MemoryCollections::new()))
            }
        },
    }
}
