//! About section stats.
//!
//! The About panel counts what the last successful sync mirrored, so it
//! reads the cached lists rather than the landing view's in-memory state.

use serde::Serialize;

use folio_core::{Certificate, MirrorStore, Project};
use folio_store::cached;

/// Numbers shown in the About panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioStats {
    /// Cached projects
    pub total_projects: usize,
    /// Cached certificates
    pub total_certificates: usize,
    /// Free-form experience label
    pub experience: String,
}

impl PortfolioStats {
    /// Counts the cached lists. A missing or malformed list counts as zero.
    pub fn from_mirror(mirror: &dyn MirrorStore, experience: impl Into<String>) -> Self {
        Self {
            total_projects: cached::read::<Project>(mirror).len(),
            total_certificates: cached::read::<Certificate>(mirror).len(),
            experience: experience.into(),
        }
    }
}
