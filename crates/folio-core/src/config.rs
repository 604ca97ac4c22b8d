//! Folio configuration.
//!
//! Resolution order for the config file:
//! 1. an explicit path (`--config`)
//! 2. the `FOLIO_CONFIG` environment variable
//! 3. `<config dir>/folio/config.toml`
//!
//! An explicit or env-provided file must exist; a missing default file means
//! built-in defaults. After the file is read, `FOLIO_PORT`, `FOLIO_REMOTE_URL`
//! and `FOLIO_API_KEY` override the matching keys.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "folio";
const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_ENV_VAR: &str = "FOLIO_CONFIG";

/// Default capacity of the local mirror (browser storage is ~5 MB).
pub const DEFAULT_MIRROR_CAPACITY: usize = 5 * 1024 * 1024;

/// Largest profile image accepted with a comment.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// HTTP surface and view settings
    pub site: SiteConfig,
    /// Remote collection client
    pub remote: RemoteConfig,
    /// Local mirror store
    pub mirror: MirrorConfig,
    /// Comment widget
    pub comments: CommentsConfig,
}

/// HTTP surface and view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Address to bind
    pub bind: String,
    /// Port to listen on
    pub port: u16,
    /// Resume file served at `/resume`
    pub resume_path: PathBuf,
    /// Repository URL used when a project has no `Github`
    pub fallback_github: String,
    /// Fetch from the remote when the detail lookup misses the cache
    pub detail_fallback_fetch: bool,
    /// Phrases cycled by the hero typewriter
    pub typewriter_words: Vec<String>,
    /// Grid items shown before "show more"
    pub initial_items: usize,
    /// How long the welcome splash stays up, in milliseconds
    pub splash_ms: u64,
    /// Experience label in the About stats
    pub experience: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            resume_path: PathBuf::from("public/resume.pdf"),
            fallback_github: "https://github.com/hritikjaiswall".to_string(),
            detail_fallback_fetch: true,
            typewriter_words: vec![
                "React Developer".to_string(),
                "Automation Enthusiast".to_string(),
                "Creative Coder".to_string(),
            ],
            initial_items: 6,
            splash_ms: 4000,
            experience: "11 Months".to_string(),
        }
    }
}

/// Which remote backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    /// In-process store, optionally seeded from a JSON file
    Memory,
    /// REST document database
    Http,
}

/// Remote collection client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Backend kind
    pub kind: RemoteKind,
    /// Base URL of the REST backend
    pub base_url: String,
    /// API key sent as `x-api-key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Poll interval for live subscriptions over REST
    pub poll_interval_ms: u64,
    /// Seed file for the memory backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
    /// Projects collection name
    pub projects_collection: String,
    /// Certificates collection name
    pub certificates_collection: String,
    /// Comments collection name
    pub comments_collection: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            kind: RemoteKind::Memory,
            base_url: "http://127.0.0.1:9090".to_string(),
            api_key: None,
            poll_interval_ms: 2000,
            seed_path: None,
            projects_collection: "projects".to_string(),
            certificates_collection: "certificates".to_string(),
            comments_collection: "portfolio-comments".to_string(),
        }
    }
}

/// Local mirror settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// File backing the mirror; in-memory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Maximum total bytes held
    pub capacity_bytes: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            path: None,
            capacity_bytes: DEFAULT_MIRROR_CAPACITY,
        }
    }
}

/// Comment widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// Largest accepted profile image
    pub max_image_bytes: usize,
    /// Blob path prefix for profile images
    pub upload_prefix: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            upload_prefix: "profile-images".to_string(),
        }
    }
}

impl FolioConfig {
    /// Project name used in messages.
    pub fn project_name() -> &'static str {
        APP_DIR_NAME
    }

    /// Default config file location for this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolve which config file to read.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load configuration from the resolved path and the process environment.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let required = explicit.is_some() || std::env::var_os(CONFIG_ENV_VAR).is_some();
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if required => {
                return Err(Error::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("FOLIO_PORT") {
            self.site.port = port
                .parse()
                .map_err(|e| Error::config(format!("Invalid FOLIO_PORT '{port}': {e}")))?;
        }
        if let Some(url) = lookup("FOLIO_REMOTE_URL") {
            self.remote.base_url = url;
            self.remote.kind = RemoteKind::Http;
        }
        if let Some(key) = lookup("FOLIO_API_KEY") {
            self.remote.api_key = Some(key);
        }
        Ok(())
    }

    /// Reject settings the site cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.site.typewriter_words.iter().all(|w| w.is_empty()) {
            return Err(Error::config("site.typewriter_words must contain a non-empty phrase"));
        }
        if self.remote.kind == RemoteKind::Http && self.remote.base_url.is_empty() {
            return Err(Error::config("remote.base_url is required for the http backend"));
        }
        if self.remote.poll_interval_ms == 0 {
            return Err(Error::config("remote.poll_interval_ms must be positive"));
        }
        if self.mirror.capacity_bytes == 0 {
            return Err(Error::config("mirror.capacity_bytes must be positive"));
        }
        Ok(())
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
