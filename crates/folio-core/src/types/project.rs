//! Project records and their normalized detail form.

use serde::{Deserialize, Serialize};

use crate::types::ProjectId;

/// Sentinel stored in `Github` for projects whose repository is not public.
pub const PRIVATE_REPOSITORY: &str = "Private";

/// A portfolio project as stored remotely and mirrored into the local cache.
///
/// Field names follow the remote documents (`Title`, `TechStack`, ...). The
/// optional fields are kept optional here; [`ProjectDetail`] is the form with
/// every field filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Remote document identifier
    pub id: ProjectId,

    /// Display title
    #[serde(rename = "Title", default)]
    pub title: String,

    /// Long-form description
    #[serde(rename = "Description", default)]
    pub description: String,

    /// Live demo URL
    #[serde(rename = "Link", default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Repository URL or [`PRIVATE_REPOSITORY`]
    #[serde(rename = "Github", default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,

    /// Technologies used, in display order
    #[serde(rename = "TechStack", default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,

    /// Key features, in display order
    #[serde(rename = "Features", default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,

    /// Card preview image
    #[serde(rename = "Img", default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl Project {
    /// Creates a project with only the required fields set.
    pub fn new(id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            link: None,
            github: None,
            tech_stack: None,
            features: None,
            img: None,
        }
    }

    /// Normalizes optional fields so the detail view never special-cases them.
    ///
    /// `TechStack` and `Features` default to empty lists, and a missing or
    /// empty `Github` becomes `fallback_github`.
    pub fn into_detail(self, fallback_github: &str) -> ProjectDetail {
        let github = match self.github.as_deref() {
            Some(PRIVATE_REPOSITORY) => GithubLink::Private,
            Some(url) if !url.is_empty() => GithubLink::Repository(url.to_string()),
            _ => GithubLink::Repository(fallback_github.to_string()),
        };

        ProjectDetail {
            id: self.id,
            title: self.title,
            description: self.description,
            link: self.link.filter(|l| !l.is_empty()),
            github,
            tech_stack: self.tech_stack.unwrap_or_default(),
            features: self.features.unwrap_or_default(),
            img: self.img,
        }
    }
}

/// Where the "Github" button of a project points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum GithubLink {
    /// Public repository URL
    Repository(String),
    /// Repository exists but is not public
    Private,
}

/// A project with every optional field resolved for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetail {
    /// Remote document identifier
    pub id: ProjectId,
    /// Display title
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Live demo URL, if any
    pub link: Option<String>,
    /// Repository link
    pub github: GithubLink,
    /// Technologies used (possibly empty)
    pub tech_stack: Vec<String>,
    /// Key features (possibly empty)
    pub features: Vec<String>,
    /// Card preview image
    pub img: Option<String>,
}

impl ProjectDetail {
    /// Live demo URL; `None` means the view shows "Live Demo Unavailable".
    pub fn live_demo(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns `true` if the repository is marked private.
    pub fn is_private(&self) -> bool {
        matches!(self.github, GithubLink::Private)
    }

    /// Number of technologies shown in the stats panel.
    pub fn technology_count(&self) -> usize {
        self.tech_stack.len()
    }

    /// Number of features shown in the stats panel.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}
