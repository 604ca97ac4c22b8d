//! Project detail lookup by route id.

use std::sync::Arc;

use folio_core::{Document, MirrorStore, Project, ProjectDetail, RemoteCollections, Result};
use folio_store::{PROJECTS_KEY, cached};

use crate::synchronizer::decode_all;

/// Remote source consulted when the cache misses.
struct Fallback {
    remote: Arc<dyn RemoteCollections>,
    collection: String,
}

/// Resolves a route id to a renderable project.
///
/// Only reads the cached project list. `None` means the caller keeps showing
/// its loading state.
pub struct ProjectResolver {
    mirror: Arc<dyn MirrorStore>,
    fallback_github: String,
    fallback: Option<Fallback>,
}

impl ProjectResolver {
    /// Creates a cache-only resolver.
    pub fn new(mirror: Arc<dyn MirrorStore>, fallback_github: impl Into<String>) -> Self {
        Self {
            mirror,
            fallback_github: fallback_github.into(),
            fallback: None,
        }
    }

    /// Lets [`resolve_or_fetch`](Self::resolve_or_fetch) read `collection`
    /// from `remote` on a cache miss.
    pub fn with_remote_fallback(
        mut self,
        remote: Arc<dyn RemoteCollections>,
        collection: impl Into<String>,
    ) -> Self {
        self.fallback = Some(Fallback {
            remote,
            collection: collection.into(),
        });
        self
    }

    /// Returns `true` if cache misses fall back to the remote store.
    pub fn fetches_on_miss(&self) -> bool {
        self.fallback.is_some()
    }

    /// Looks up `id` in the cached project list. The first exact match wins.
    pub fn resolve(&self, id: &str) -> Option<ProjectDetail> {
        let projects = cached::read::<Project>(self.mirror.as_ref());
        let found = self.find(projects, id);
        if found.is_none() {
            tracing::debug!(id, key = PROJECTS_KEY, "Project not in cache");
        }
        found
    }

    /// Like [`resolve`](Self::resolve), but reads the remote collection on a
    /// miss when a fallback is configured. The cache is never written here.
    pub async fn resolve_or_fetch(&self, id: &str) -> Result<Option<ProjectDetail>> {
        if let Some(detail) = self.resolve(id) {
            return Ok(Some(detail));
        }
        let Some(ref fallback) = self.fallback else {
            return Ok(None);
        };

        let documents = fallback.remote.fetch_all(&fallback.collection).await?;
        let projects = decode_all(&documents, &fallback.collection, Document::decode::<Project>);
        let found = self.find(projects, id);
        tracing::debug!(id, found = found.is_some(), "Project looked up remotely");
        Ok(found)
    }

    fn find(&self, projects: Vec<Project>, id: &str) -> Option<ProjectDetail> {
        projects
            .into_iter()
            .find(|p| p.id.matches(id))
            .map(|p| p.into_detail(&self.fallback_github))
    }
}

impl std::fmt::Debug for ProjectResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectResolver")
            .field("fallback_github", &self.fallback_github)
            .field("fetches_on_miss", &self.fetches_on_miss())
            .finish()
    }
}
