//! REST document database client.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation | Request | Response |
//! |---|---|---|
//! | fetch all | `GET /v1/collections/{name}/documents` | `{"documents": [{"id", "fields"}]}` |
//! | append | `POST /v1/collections/{name}/documents` | `{"id"}` |
//! | upload | `PUT /v1/blobs/{path}` (raw bytes) | `{"url"}` |
//!
//! The REST surface has no push channel, so a subscription polls the
//! collection and emits a snapshot only when it differs from the last one.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use folio_core::{
    Document, DocumentId, Error, NewDocument, OrderBy, RemoteCollections, Result, Subscription,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    id: DocumentId,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// [`RemoteCollections`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCollections {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    poll_interval: Duration,
}

impl HttpCollections {
    /// Create a client for the database at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            poll_interval: Duration::from_secs(2),
        }
    }

    /// Send `api_key` with every request.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// How often live subscriptions poll.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// URL of a collection's documents resource.
    pub fn documents_url(&self, collection: &str) -> String {
        format!("{}/v1/collections/{collection}/documents", self.base_url)
    }

    /// URL of a blob resource.
    pub fn blob_url(&self, path: &str) -> String {
        format!("{}/v1/blobs/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn fetch_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let url = self.documents_url(collection);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::remote_with_source(format!("GET {url} failed"), e))?;

        let body: DocumentsResponse = response
            .json()
            .await
            .map_err(|e| Error::remote_with_source(format!("GET {url} returned bad JSON"), e))?;
        Ok(body.documents)
    }

    /// Poll `collection` until the subscription is dropped.
    async fn poll(
        self,
        collection: String,
        order_by: OrderBy,
        mut last: Vec<Document>,
        tx: mpsc::UnboundedSender<Vec<Document>>,
    ) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the initial snapshot is already sent.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                break;
            }

            let mut snapshot = match self.fetch_documents(&collection).await {
                Ok(docs) => docs,
                Err(e) => {
                    tracing::warn!(collection = %collection, error = %e, "Subscription poll failed");
                    continue;
                }
            };
            order_by.sort(&mut snapshot);

            if snapshot != last {
                if tx.send(snapshot.clone()).is_err() {
                    break;
                }
                last = snapshot;
            }
        }
        tracing::debug!(collection = %collection, "Subscription poller stopped");
    }
}

#[async_trait]
impl RemoteCollections for HttpCollections {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>> {
        let documents = self.fetch_documents(collection).await?;
        tracing::debug!(collection, count = documents.len(), "Fetched collection");
        Ok(documents)
    }

    async fn subscribe(&self, collection: &str, order_by: &OrderBy) -> Result<Subscription> {
        let mut initial = self.fetch_documents(collection).await?;
        order_by.sort(&mut initial);

        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is alive, so the initial send cannot fail.
        let _ = tx.send(initial.clone());

        let worker = tokio::spawn(self.clone().poll(
            collection.to_string(),
            order_by.clone(),
            initial,
            tx,
        ));
        Ok(Subscription::with_worker(rx, worker))
    }

    async fn append(&self, collection: &str, document: NewDocument) -> Result<DocumentId> {
        let url = self.documents_url(collection);
        let response = self
            .authorize(self.client.post(&url).json(&document))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::remote_with_source(format!("POST {url} failed"), e))?;

        let body: AppendResponse = response
            .json()
            .await
            .map_err(|e| Error::remote_with_source(format!("POST {url} returned bad JSON"), e))?;
        Ok(body.id)
    }

    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        let url = self.blob_url(path);
        let size = bytes.len();
        let response = self
            .authorize(
                self.client
                    .put(&url)
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                    .body(bytes),
            )
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::remote_with_source(format!("PUT {url} failed"), e))?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::remote_with_source(format!("PUT {url} returned bad JSON"), e))?;
        tracing::debug!(path, size, "Blob uploaded");
        Ok(body.url)
    }

    fn name(&self) -> &str {
        "http"
    }
}
