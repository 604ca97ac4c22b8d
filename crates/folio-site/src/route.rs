//! Site routes.

use std::fmt;

use folio_core::ProjectId;

/// A page of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Landing,
    /// `/project/{id}`
    ProjectDetail(ProjectId),
}

impl Route {
    /// Parses a request path. Query strings, fragments and a trailing slash
    /// are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return Some(Route::Landing);
        }

        let id = path.strip_prefix("/project/")?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Route::ProjectDetail(ProjectId::new(id)))
    }

    /// Link target for this route.
    pub fn href(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::ProjectDetail(id) => format!("/project/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}
