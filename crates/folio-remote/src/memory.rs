//! In-process document store.
//!
//! Behaves like the hosted database from the site's point of view: ids and
//! timestamps are assigned on insert, subscribers get a full ordered snapshot
//! on subscribe and after every insert, and uploaded blobs get a URL.
//! Tests can inject failures, add latency, and count calls per operation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use folio_core::{
    Clock, Document, DocumentId, Error, NewDocument, OrderBy, RemoteCollections, Result,
    Subscription, SystemClock,
};

/// Base of the URLs handed out for uploaded blobs.
const DEFAULT_BLOB_BASE: &str = "memory://blobs";

/// Remote operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `fetch_all`
    FetchAll,
    /// `subscribe`
    Subscribe,
    /// `append`
    Append,
    /// `upload_blob`
    UploadBlob,
}

struct Subscriber {
    order_by: OrderBy,
    tx: mpsc::UnboundedSender<Vec<Document>>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Document>>,
    subscribers: HashMap<String, Vec<Subscriber>>,
    blobs: HashMap<String, Vec<u8>>,
    last_timestamp: Option<DateTime<Utc>>,
    failures: HashMap<Operation, usize>,
    calls: HashMap<Operation, usize>,
}

/// In-process [`RemoteCollections`] backend.
pub struct MemoryCollections {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
    blob_base: String,
    latency: Mutex<Option<Duration>>,
}

impl MemoryCollections {
    /// Creates an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store that timestamps inserts with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
            blob_base: DEFAULT_BLOB_BASE.to_string(),
            latency: Mutex::new(None),
        }
    }

    /// Loads a seed file shaped `{"collection": [{...}, ...], ...}`.
    ///
    /// An `id` in a seed object becomes the document id; objects without
    /// one get a generated id.
    pub fn from_seed_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let seed: HashMap<String, Vec<Map<String, Value>>> = serde_json::from_str(&content)?;

        let store = Self::new();
        let mut total = 0;
        for (collection, objects) in seed {
            for mut fields in objects {
                let id = match fields.remove("id") {
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => generate_id(),
                };
                store.insert(&collection, Document::new(id, fields));
                total += 1;
            }
        }
        tracing::info!(path = %path.display(), documents = total, "Seeded memory collections");
        Ok(store)
    }

    /// Inserts a document as-is, without assigning ids or timestamps.
    pub fn insert(&self, collection: &str, document: Document) {
        if let Ok(mut inner) = self.lock() {
            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(document);
            publish(&mut inner, collection);
        }
    }

    /// Makes the next `times` calls of `op` fail with a remote error.
    pub fn fail_next(&self, op: Operation, times: usize) {
        if let Ok(mut inner) = self.lock() {
            *inner.failures.entry(op).or_default() += times;
        }
    }

    /// Delays every append and upload by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut slot) = self.latency.lock() {
            *slot = latency;
        }
    }

    /// Number of calls made to `op`, including failed ones.
    pub fn calls(&self, op: Operation) -> usize {
        self.lock()
            .map(|inner| inner.calls.get(&op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Current contents of a collection, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.lock()
            .map(|inner| inner.collections.get(collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Bytes stored under a blob path.
    pub fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().ok()?.blobs.get(path).cloned()
    }

    /// Number of live subscribers on a collection.
    pub fn subscriber_count(&self, collection: &str) -> usize {
        self.lock()
            .map(|mut inner| {
                let subs = inner.subscribers.entry(collection.to_string()).or_default();
                subs.retain(|s| !s.tx.is_closed());
                subs.len()
            })
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::remote("memory collections lock poisoned"))
    }

    /// Counts the call and consumes an injected failure if one is pending.
    fn enter(&self, op: Operation, collection: &str) -> Result<()> {
        let mut inner = self.lock()?;
        *inner.calls.entry(op).or_default() += 1;
        if let Some(remaining) = inner.failures.get_mut(&op)
            && *remaining > 0
        {
            *remaining -= 1;
            tracing::debug!(?op, collection, "Injected remote failure");
            return Err(Error::remote(format!("injected {op:?} failure on '{collection}'")));
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        let latency = self.latency.lock().ok().and_then(|slot| *slot);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Server timestamp, strictly increasing across inserts.
    fn next_timestamp(&self, inner: &mut Inner) -> DateTime<Utc> {
        let mut now = self.clock.now();
        if let Some(last) = inner.last_timestamp
            && now <= last
        {
            now = last + chrono::Duration::microseconds(1);
        }
        inner.last_timestamp = Some(now);
        now
    }
}

impl Default for MemoryCollections {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCollections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCollections")
            .field("blob_base", &self.blob_base)
            .finish()
    }
}

#[async_trait]
impl RemoteCollections for MemoryCollections {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.enter(Operation::FetchAll, collection)?;
        Ok(self.documents(collection))
    }

    async fn subscribe(&self, collection: &str, order_by: &OrderBy) -> Result<Subscription> {
        self.enter(Operation::Subscribe, collection)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock()?;
        let mut snapshot = inner.collections.get(collection).cloned().unwrap_or_default();
        order_by.sort(&mut snapshot);
        // The receiver is alive, so the initial send cannot fail.
        let _ = tx.send(snapshot);

        inner
            .subscribers
            .entry(collection.to_string())
            .or_default()
            .push(Subscriber {
                order_by: order_by.clone(),
                tx,
            });
        tracing::debug!(collection, "Subscriber registered");
        Ok(Subscription::new(rx))
    }

    async fn append(&self, collection: &str, document: NewDocument) -> Result<DocumentId> {
        self.enter(Operation::Append, collection)?;
        self.simulate_latency().await;

        let mut inner = self.lock()?;
        let mut fields = document.fields;
        if let Some(field) = document.server_timestamp {
            let ts = self.next_timestamp(&mut inner);
            fields.insert(
                field,
                Value::String(ts.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }

        let id = DocumentId::new(generate_id());
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        publish(&mut inner, collection);

        tracing::debug!(collection, id = %id, "Document appended");
        Ok(id)
    }

    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        self.enter(Operation::UploadBlob, path)?;
        self.simulate_latency().await;

        let size = bytes.len();
        self.lock()?.blobs.insert(path.to_string(), bytes);
        tracing::debug!(path, size, "Blob stored");
        Ok(format!("{}/{}", self.blob_base, path))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Push a fresh ordered snapshot to every live subscriber of `collection`.
fn publish(inner: &mut Inner, collection: &str) {
    let Some(documents) = inner.collections.get(collection) else {
        return;
    };
    let Some(subscribers) = inner.subscribers.get_mut(collection) else {
        return;
    };

    subscribers.retain(|sub| {
        let mut snapshot = documents.clone();
        sub.order_by.sort(&mut snapshot);
        sub.tx.send(snapshot).is_ok()
    });
}

/// 20-character document id, the same length the hosted store uses.
fn generate_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(20);
    id
}
