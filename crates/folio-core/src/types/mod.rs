//! Core data types for the portfolio site.

mod certificate;
mod comment;
mod document;
mod ids;
mod project;
mod proptests;

pub use certificate::Certificate;
pub use comment::{CREATED_AT_FIELD, Comment};
pub use document::{Direction, Document, NewDocument, OrderBy};
pub use ids::{DocumentId, ProjectId};
pub use project::{GithubLink, PRIVATE_REPOSITORY, Project, ProjectDetail};
