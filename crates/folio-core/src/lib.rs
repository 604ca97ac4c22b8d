#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Folio Core: shared types, traits, errors, and configuration.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Projects, certificates, comments, raw documents
//! - [`traits`]: Remote collection and local mirror seams
//! - [`lifecycle`]: Mounted/unmounted view tracking
//! - [`clock`]: Injectable wall clock
//! - [`config`]: TOML configuration with env overrides

pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FolioConfig;
pub use error::{Error, Result};
pub use lifecycle::{ViewHandle, ViewState};
pub use traits::{MirrorStore, RemoteCollections, Subscription};
pub use types::{
    Certificate, Comment, Document, DocumentId, GithubLink, NewDocument, OrderBy, Project,
    ProjectDetail, ProjectId,
};
