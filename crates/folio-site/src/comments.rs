//! Comment stream: the live feed and the submit path.
//!
//! A submission goes through, in order: the in-flight gate, field validation,
//! the image size check, the optional image upload, and finally the append.
//! Nothing touches the network until the first three have passed.

use std::collections::HashSet;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures::Stream;
use serde_json::{Map, Value};

use folio_core::config::{CommentsConfig, DEFAULT_MAX_IMAGE_BYTES};
use folio_core::types::CREATED_AT_FIELD;
use folio_core::{
    Clock, Comment, Document, DocumentId, NewDocument, OrderBy, RemoteCollections, Result,
    Subscription, SystemClock,
};

use crate::error::{SubmitError, SubmitResult};
use crate::synchronizer::decode_all;

/// Default comments collection.
pub const COMMENTS_COLLECTION: &str = "portfolio-comments";

/// Profile image attached to a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// Original file name
    pub file_name: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Creates an attachment.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Last path segment of the file name, so uploads stay under their prefix.
    fn base_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("image")
    }
}

/// A comment as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    /// Author name
    pub author: String,
    /// Comment text
    pub text: String,
    /// Optional profile image
    pub image: Option<ImageAttachment>,
}

impl CommentDraft {
    /// Creates a draft without an image.
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            image: None,
        }
    }

    /// Attaches a profile image.
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

/// Clears the in-flight mark when the submission ends, however it ends.
enum InFlightGuard<'a> {
    Stream(&'a AtomicBool),
    Client(&'a Mutex<HashSet<String>>, String),
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        match self {
            InFlightGuard::Stream(flag) => flag.store(false, Ordering::Release),
            InFlightGuard::Client(clients, client) => {
                lock_clients(clients).remove(client.as_str());
            }
        }
    }
}

fn lock_clients(clients: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    match clients.lock() {
        Ok(clients) => clients,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Live view of the comments collection plus the submit path.
pub struct CommentStream {
    remote: Arc<dyn RemoteCollections>,
    clock: Arc<dyn Clock>,
    collection: String,
    max_image_bytes: usize,
    upload_prefix: String,
    in_flight: AtomicBool,
    clients_in_flight: Mutex<HashSet<String>>,
}

impl CommentStream {
    /// Creates a stream over the default collection with default limits.
    pub fn new(remote: Arc<dyn RemoteCollections>) -> Self {
        Self {
            remote,
            clock: Arc::new(SystemClock),
            collection: COMMENTS_COLLECTION.to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            upload_prefix: CommentsConfig::default().upload_prefix,
            in_flight: AtomicBool::new(false),
            clients_in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Uses a different collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Applies image limit and upload prefix from configuration.
    pub fn with_config(mut self, config: &CommentsConfig) -> Self {
        self.max_image_bytes = config.max_image_bytes;
        self.upload_prefix = config.upload_prefix.clone();
        self
    }

    /// Uses `clock` for upload file names.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Collection this stream reads and writes.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns `true` while a [`submit`](Self::submit) is running.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns `true` while a [`submit_for`](Self::submit_for) of `client`
    /// is running.
    pub fn is_submitting_for(&self, client: &str) -> bool {
        lock_clients(&self.clients_in_flight).contains(client)
    }

    /// Opens a live, newest-first feed of comments.
    pub async fn subscribe(&self) -> Result<CommentFeed> {
        let subscription = self
            .remote
            .subscribe(&self.collection, &OrderBy::desc(CREATED_AT_FIELD))
            .await?;
        tracing::debug!(collection = %self.collection, "Comment feed opened");
        Ok(CommentFeed::new(subscription, self.collection.clone()))
    }

    /// Posts a comment and returns the id the store assigned.
    ///
    /// A second call while one is running fails with
    /// [`SubmitError::InFlight`]; it is not queued.
    pub async fn submit(&self, draft: CommentDraft) -> SubmitResult<DocumentId> {
        let _guard = self.begin()?;
        self.post(draft).await
    }

    /// Posts a comment on behalf of one client among many sharing this
    /// stream.
    ///
    /// Only submissions from the same `client` exclude each other; different
    /// clients post concurrently and are ordered by the server timestamp.
    pub async fn submit_for(
        &self,
        client: &str,
        draft: CommentDraft,
    ) -> SubmitResult<DocumentId> {
        let _guard = self.begin_for(client)?;
        self.post(draft).await
    }

    async fn post(&self, draft: CommentDraft) -> SubmitResult<DocumentId> {

        let author = draft.author.trim();
        if author.is_empty() {
            return Err(SubmitError::validation("author", "must not be empty"));
        }
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(SubmitError::validation("text", "must not be empty"));
        }
        if let Some(ref image) = draft.image
            && image.bytes.len() > self.max_image_bytes
        {
            return Err(SubmitError::ImageTooLarge {
                size: image.bytes.len(),
                limit: self.max_image_bytes,
            });
        }

        let profile_image = match draft.image {
            Some(ref image) => Some(self.upload(image).await.map_err(SubmitError::Network)?),
            None => None,
        };

        let mut fields = Map::new();
        fields.insert("content".to_string(), Value::String(text.to_string()));
        fields.insert("userName".to_string(), Value::String(author.to_string()));
        fields.insert(
            "profileImage".to_string(),
            profile_image.clone().map(Value::String).unwrap_or(Value::Null),
        );
        let document = NewDocument::new(fields).with_server_timestamp(CREATED_AT_FIELD);

        match self.remote.append(&self.collection, document).await {
            Ok(id) => {
                tracing::info!(collection = %self.collection, id = %id, "Comment posted");
                Ok(id)
            }
            Err(source) => {
                tracing::error!(collection = %self.collection, error = %source, "Comment append failed");
                Err(match profile_image {
                    Some(blob_url) => SubmitError::PartialFailure { blob_url, source },
                    None => SubmitError::Network(source),
                })
            }
        }
    }

    fn begin(&self) -> SubmitResult<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard::Stream(&self.in_flight))
            .map_err(|_| SubmitError::InFlight)
    }

    fn begin_for(&self, client: &str) -> SubmitResult<InFlightGuard<'_>> {
        if !lock_clients(&self.clients_in_flight).insert(client.to_string()) {
            return Err(SubmitError::InFlight);
        }
        Ok(InFlightGuard::Client(&self.clients_in_flight, client.to_string()))
    }

    async fn upload(&self, image: &ImageAttachment) -> Result<String> {
        let path = format!(
            "{}/{}_{}",
            self.upload_prefix,
            self.clock.now().timestamp_millis(),
            image.base_name()
        );
        let url = self.remote.upload_blob(&path, image.bytes.clone()).await;
        if let Err(ref e) = url {
            tracing::error!(path = %path, error = %e, "Profile image upload failed");
        }
        url
    }
}

impl std::fmt::Debug for CommentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentStream")
            .field("collection", &self.collection)
            .field("max_image_bytes", &self.max_image_bytes)
            .field("submitting", &self.is_submitting())
            .finish()
    }
}

/// Live comment list, newest first.
///
/// Holds the remote subscription; dropping the feed releases it.
#[derive(Debug)]
pub struct CommentFeed {
    subscription: Subscription,
    collection: String,
    current: Vec<Comment>,
}

impl CommentFeed {
    fn new(subscription: Subscription, collection: String) -> Self {
        Self {
            subscription,
            collection,
            current: Vec::new(),
        }
    }

    /// Waits for the next snapshot. `None` once the remote side has closed.
    pub async fn next(&mut self) -> Option<&[Comment]> {
        let documents = self.subscription.next_snapshot().await?;
        self.current = decode_all(&documents, &self.collection, Document::decode::<Comment>);
        Some(&self.current)
    }

    /// The most recent snapshot.
    pub fn current(&self) -> &[Comment] {
        &self.current
    }

    /// Releases the live connection.
    pub fn release(self) {
        drop(self);
    }
}

impl Stream for CommentFeed {
    type Item = Vec<Comment>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.subscription).poll_next(cx) {
            Poll::Ready(Some(documents)) => {
                this.current =
                    decode_all(&documents, &this.collection, Document::decode::<Comment>);
                Poll::Ready(Some(this.current.clone()))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
