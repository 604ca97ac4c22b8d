//! Portfolio data synchronizer.
//!
//! One `sync` per landing mount: fetch projects and certificates from the
//! remote store, show them if the landing view is still up, and mirror them
//! into the local cache so the detail view can read them later.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use folio_core::{
    Certificate, Document, Error, MirrorStore, Project, RemoteCollections, Result, ViewHandle,
};
use folio_store::{CERTIFICATES_KEY, PROJECTS_KEY, cached};

/// Lists currently shown by the landing view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioView {
    /// Projects, in remote order
    pub projects: Vec<Project>,
    /// Certificates, in remote order
    pub certificates: Vec<Certificate>,
}

impl PortfolioView {
    /// First page of the project grid; everything when `show_all`.
    pub fn projects_page(&self, initial_items: usize, show_all: bool) -> &[Project] {
        page(&self.projects, initial_items, show_all)
    }

    /// First page of the certificate grid; everything when `show_all`.
    pub fn certificates_page(&self, initial_items: usize, show_all: bool) -> &[Certificate] {
        page(&self.certificates, initial_items, show_all)
    }
}

fn page<T>(items: &[T], initial_items: usize, show_all: bool) -> &[T] {
    if show_all {
        items
    } else {
        &items[..initial_items.min(items.len())]
    }
}

/// Whether a fetched result reached the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The view was mounted and now shows the fetched lists.
    Applied,
    /// The view was gone by the time the fetch finished.
    Discarded,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// The fetched lists
    pub view: PortfolioView,
    /// Whether the lists were applied to the view
    pub outcome: SyncOutcome,
    /// Whether both lists reached the mirror
    pub mirrored: bool,
}

/// Fetches portfolio lists and keeps the view and the mirror current.
pub struct PortfolioSynchronizer {
    remote: Arc<dyn RemoteCollections>,
    mirror: Arc<dyn MirrorStore>,
    projects_collection: String,
    certificates_collection: String,
    state: RwLock<PortfolioView>,
}

impl PortfolioSynchronizer {
    /// Creates a synchronizer with empty view state.
    pub fn new(remote: Arc<dyn RemoteCollections>, mirror: Arc<dyn MirrorStore>) -> Self {
        Self {
            remote,
            mirror,
            projects_collection: PROJECTS_KEY.to_string(),
            certificates_collection: CERTIFICATES_KEY.to_string(),
            state: RwLock::new(PortfolioView::default()),
        }
    }

    /// Reads from differently named remote collections.
    pub fn with_collections(
        mut self,
        projects: impl Into<String>,
        certificates: impl Into<String>,
    ) -> Self {
        self.projects_collection = projects.into();
        self.certificates_collection = certificates.into();
        self
    }

    /// Snapshot of the lists the view currently shows.
    pub fn view(&self) -> PortfolioView {
        match self.state.read() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Fetches both lists once.
    ///
    /// On failure the view and the mirror are left as they were and the
    /// error is returned. A failed mirror write is logged and reported in
    /// [`SyncReport::mirrored`]; it does not undo the view update.
    pub async fn sync(&self, view: &ViewHandle) -> Result<SyncReport> {
        let fetched = futures::try_join!(
            self.remote.fetch_all(&self.projects_collection),
            self.remote.fetch_all(&self.certificates_collection),
        );
        let (project_docs, certificate_docs) = match fetched {
            Ok(docs) => docs,
            Err(e) => {
                tracing::error!(view = view.name(), error = %e, "Portfolio fetch failed");
                return Err(e);
            }
        };

        let lists = PortfolioView {
            projects: decode_all(&project_docs, &self.projects_collection, Document::decode),
            certificates: decode_all(
                &certificate_docs,
                &self.certificates_collection,
                Document::decode_fields,
            ),
        };

        let outcome = if view.is_mounted() {
            self.apply(lists.clone());
            SyncOutcome::Applied
        } else {
            tracing::debug!(view = view.name(), "View unmounted, discarding fetched lists");
            SyncOutcome::Discarded
        };

        let mirrored = match self.mirror_lists(&lists).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Mirror write failed, cache may be stale");
                false
            }
        };

        tracing::info!(
            projects = lists.projects.len(),
            certificates = lists.certificates.len(),
            ?outcome,
            mirrored,
            "Portfolio synced"
        );

        Ok(SyncReport {
            view: lists,
            outcome,
            mirrored,
        })
    }

    fn apply(&self, lists: PortfolioView) {
        match self.state.write() {
            Ok(mut state) => *state = lists,
            Err(poisoned) => *poisoned.into_inner() = lists,
        }
    }

    /// Serializes both lists, then writes them as one batch off the async
    /// workers, since a file-backed mirror blocks on disk I/O.
    ///
    /// The batch is all-or-nothing for the bundled mirrors; a custom
    /// [`MirrorStore`] without its own `set_all` may be left half written.
    async fn mirror_lists(&self, lists: &PortfolioView) -> Result<()> {
        let projects = cached::encode(&lists.projects)?;
        let certificates = cached::encode(&lists.certificates)?;
        let mirror = self.mirror.clone();

        tokio::task::spawn_blocking(move || {
            mirror.set_all(&[
                (PROJECTS_KEY, projects.as_str()),
                (CERTIFICATES_KEY, certificates.as_str()),
            ])
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

impl std::fmt::Debug for PortfolioSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSynchronizer")
            .field("remote", &self.remote.name())
            .field("projects_collection", &self.projects_collection)
            .field("certificates_collection", &self.certificates_collection)
            .finish()
    }
}

/// Decodes every document, skipping the ones that do not fit `T`.
pub(crate) fn decode_all<T>(
    documents: &[Document],
    collection: &str,
    decode: impl Fn(&Document) -> Result<T>,
) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| match decode(doc) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(collection, id = %doc.id, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}
