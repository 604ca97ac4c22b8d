//! Wiring of the site components from configuration.

use std::sync::Arc;
use std::time::Duration;

use folio_core::{FolioConfig, MirrorStore, RemoteCollections, Result};

use crate::about::PortfolioStats;
use crate::comments::CommentStream;
use crate::resolver::ProjectResolver;
use crate::splash::SplashGate;
use crate::synchronizer::PortfolioSynchronizer;
use crate::typewriter::Typewriter;

/// Every site component, sharing one remote client and one mirror.
pub struct Site {
    config: FolioConfig,
    remote: Arc<dyn RemoteCollections>,
    mirror: Arc<dyn MirrorStore>,
    /// Landing list sync
    pub synchronizer: PortfolioSynchronizer,
    /// Detail lookup
    pub resolver: ProjectResolver,
    /// Comment widget
    pub comments: CommentStream,
    /// Welcome splash
    pub splash: SplashGate,
}

impl Site {
    /// Opens the configured mirror and remote backends and wires the components.
    pub fn from_config(config: FolioConfig) -> Result<Self> {
        let mirror = folio_store::open_mirror(&config.mirror)?;
        let remote = folio_remote::create_remote(&config.remote)?;
        Ok(Self::with_parts(config, remote, mirror))
    }

    /// Wires the components around existing backends.
    pub fn with_parts(
        config: FolioConfig,
        remote: Arc<dyn RemoteCollections>,
        mirror: Arc<dyn MirrorStore>,
    ) -> Self {
        let synchronizer = PortfolioSynchronizer::new(remote.clone(), mirror.clone())
            .with_collections(
                config.remote.projects_collection.clone(),
                config.remote.certificates_collection.clone(),
            );

        let mut resolver =
            ProjectResolver::new(mirror.clone(), config.site.fallback_github.clone());
        if config.site.detail_fallback_fetch {
            resolver = resolver
                .with_remote_fallback(remote.clone(), config.remote.projects_collection.clone());
        }

        let comments = CommentStream::new(remote.clone())
            .with_collection(config.remote.comments_collection.clone())
            .with_config(&config.comments);

        let splash = SplashGate::new(Duration::from_millis(config.site.splash_ms));

        Self {
            config,
            remote,
            mirror,
            synchronizer,
            resolver,
            comments,
            splash,
        }
    }

    /// The configuration the site was built from.
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// The shared remote client.
    pub fn remote(&self) -> &Arc<dyn RemoteCollections> {
        &self.remote
    }

    /// About panel counts from the mirrored lists.
    pub fn about(&self) -> PortfolioStats {
        PortfolioStats::from_mirror(self.mirror.as_ref(), self.config.site.experience.clone())
    }

    /// A fresh hero typewriter over the configured phrases.
    pub fn typewriter(&self) -> Result<Typewriter> {
        Typewriter::new(self.config.site.typewriter_words.clone())
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("remote", &self.remote.name())
            .field("synchronizer", &self.synchronizer)
            .field("resolver", &self.resolver)
            .field("comments", &self.comments)
            .finish()
    }
}
