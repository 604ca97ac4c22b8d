//! Welcome splash, shown once per browser session.
//!
//! The server keeps no record of who has seen it. The first landing response
//! sets [`SPLASH_COOKIE`] without an expiry, so the browser drops it when the
//! session ends and the splash shows again next time.

use std::time::Duration;

/// Cookie identifying one visitor for comment posting.
pub const SESSION_COOKIE: &str = "folio_session";

/// Cookie marking that this browser session has seen the splash.
pub const SPLASH_COOKIE: &str = "folio_splash";

const SEEN: &str = "1";

/// Decides whether a landing visit shows the splash.
#[derive(Debug, Clone, Copy)]
pub struct SplashGate {
    duration: Duration,
}

impl SplashGate {
    /// Creates a gate whose splash stays up for `duration`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// How long the splash stays up.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// `true` unless the request carried the splash cookie with value `1`.
    pub fn first_visit(&self, splash_cookie: Option<&str>) -> bool {
        splash_cookie != Some(SEEN)
    }

    /// `Set-Cookie` value recording that the splash was shown.
    pub fn seen_cookie(&self) -> String {
        format!("{SPLASH_COOKIE}={SEEN}; Path=/; SameSite=Lax")
    }
}
