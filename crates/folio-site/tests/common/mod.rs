//! Common test utilities and harness for folio-site integration tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{Map, Value, json};

use folio_core::{Document, FolioConfig, ManualClock};
use folio_remote::MemoryCollections;
use folio_site::{CommentStream, Site};
use folio_store::MemoryMirror;

/// Test harness for integration tests.
///
/// Wires a [`Site`] around an in-process remote store, an in-memory mirror
/// and a frozen clock so tests can inspect every collaborator.
pub struct TestHarness {
    /// In-process remote store
    pub remote: Arc<MemoryCollections>,
    /// Local mirror
    pub mirror: Arc<MemoryMirror>,
    /// Clock used for upload names
    pub clock: Arc<ManualClock>,
    /// Site under test
    pub site: Site,
}

impl TestHarness {
    /// Creates a harness with default configuration and empty stores.
    pub fn new() -> Self {
        Self::with_config(FolioConfig::default())
    }

    /// Creates a harness with custom configuration.
    pub fn with_config(config: FolioConfig) -> Self {
        let remote = Arc::new(MemoryCollections::new());
        let mirror = Arc::new(MemoryMirror::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        ));
        let site = Site::with_parts(config, remote.clone(), mirror.clone());
        Self {
            remote,
            mirror,
            clock,
            site,
        }
    }

    /// A comment stream on the harness remote that names uploads with the harness clock.
    pub fn comment_stream(&self) -> CommentStream {
        CommentStream::new(self.remote.clone())
            .with_config(&self.site.config().comments)
            .with_clock(self.clock.clone())
    }

    /// Inserts a project document built from JSON fields.
    pub fn add_project(&self, id: &str, body: Value) {
        self.remote.insert("projects", Document::new(id, object(body)));
    }

    /// Inserts a certificate document.
    pub fn add_certificate(&self, img: &str) {
        self.remote.insert(
            "certificates",
            Document::new(format!("cert-{img}"), object(json!({ "Img": img }))),
        );
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
