//! Comments posted through the comment widget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::DocumentId;

/// Field the remote store fills with its server timestamp on insert.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// A comment as delivered by a live snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Remote document identifier
    pub id: DocumentId,

    /// Author display name
    #[serde(rename = "userName")]
    pub user_name: String,

    /// Comment text
    pub content: String,

    /// Uploaded profile image URL
    #[serde(rename = "profileImage", default)]
    pub profile_image: Option<String>,

    /// Server-assigned creation time; `None` while the write is pending
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Returns `true` if the server has not yet assigned a timestamp.
    pub fn is_pending(&self) -> bool {
        self.created_at.is_none()
    }
}
