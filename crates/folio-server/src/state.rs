//! Shared handler state.

use std::path::PathBuf;
use std::sync::Arc;

use folio_core::{Clock, SystemClock};
use folio_site::Site;

/// Shared handler state.
pub struct AppState {
    /// Site components
    pub site: Site,
    /// Clock for relative comment times
    pub clock: Arc<dyn Clock>,
    /// File served at `/resume`
    pub resume_path: PathBuf,
}

impl AppState {
    /// Wraps a site for the router.
    pub fn new(site: Site) -> Arc<Self> {
        Self::with_clock(site, Arc::new(SystemClock))
    }

    /// Wraps a site with an explicit clock.
    pub fn with_clock(site: Site, clock: Arc<dyn Clock>) -> Arc<Self> {
        let resume_path = site.config().site.resume_path.clone();
        Arc::new(Self {
            site,
            clock,
            resume_path,
        })
    }
}
