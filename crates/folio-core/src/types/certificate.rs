//! Certificate records.

use serde::{Deserialize, Serialize};

/// A certificate image shown in the portfolio grid.
///
/// Certificates have no identity beyond their position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Image URL
    #[serde(rename = "Img")]
    pub img: String,
}

impl Certificate {
    /// Creates a certificate pointing at an image URL.
    pub fn new(img: impl Into<String>) -> Self {
        Self { img: img.into() }
    }
}
