//! Seams between the site logic and its collaborators.
//!
//! - [`RemoteCollections`]: the hosted document database (source of truth)
//! - [`MirrorStore`]: the local best-effort cache of the last successful fetch
//! - [`Subscription`]: a live, ordered view of one remote collection

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::types::{Document, DocumentId, NewDocument, OrderBy};

/// Abstract remote collection client.
///
/// Implementations:
/// - `MemoryCollections`: in-process store with live snapshots (dev and tests)
/// - `HttpCollections`: REST client for a hosted document database
///
/// No method retries or times out; a failure is returned to the caller once.
#[async_trait]
pub trait RemoteCollections: Send + Sync {
    /// Fetch every document in a collection, in store order.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Open a live view of a collection.
    ///
    /// The first snapshot reflects the collection at subscription time; each
    /// later insert pushes a new full snapshot sorted by `order_by`.
    async fn subscribe(&self, collection: &str, order_by: &OrderBy) -> Result<Subscription>;

    /// Append a document and return the identifier the store assigned.
    async fn append(&self, collection: &str, document: NewDocument) -> Result<DocumentId>;

    /// Upload bytes under `path` and return a public URL for them.
    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> Result<String>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Live stream of full collection snapshots.
///
/// Dropping the subscription releases it: the producer notices the closed
/// channel and stops, and a background poller (if any) is aborted.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Vec<Document>>,
    worker: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Creates a subscription fed by a producer holding the sender half.
    pub fn new(rx: mpsc::UnboundedReceiver<Vec<Document>>) -> Self {
        Self { rx, worker: None }
    }

    /// Creates a subscription that owns the task producing its snapshots.
    pub fn with_worker(rx: mpsc::UnboundedReceiver<Vec<Document>>, worker: JoinHandle<()>) -> Self {
        Self {
            rx,
            worker: Some(worker),
        }
    }

    /// Waits for the next snapshot; `None` once the producer has gone away.
    pub async fn next_snapshot(&mut self) -> Option<Vec<Document>> {
        self.rx.recv().await
    }

    /// Releases the live connection.
    pub fn release(self) {
        drop(self);
    }
}

impl Stream for Subscription {
    type Item = Vec<Document>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("has_worker", &self.worker.is_some())
            .finish()
    }
}

/// Local key-value mirror of remote lists.
///
/// Every call is atomic on its own; there is no multi-key transaction.
pub trait MirrorStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Store several entries together.
    ///
    /// The default writes them one at a time, so a failure part-way leaves
    /// the earlier entries written. Backends that can check the whole batch
    /// before writing override it to make the batch all-or-nothing.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        entries.iter().try_for_each(|(key, value)| self.set(key, value))
    }
}
