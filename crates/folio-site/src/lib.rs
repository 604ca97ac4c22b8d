#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod about;
pub mod comments;
pub mod error;
pub mod relative_time;
pub mod resolver;
pub mod route;
pub mod site;
pub mod splash;
pub mod synchronizer;
pub mod typewriter;

pub use about::PortfolioStats;
pub use comments::{CommentDraft, CommentFeed, CommentStream, ImageAttachment};
pub use error::{NETWORK_FAILURE_MESSAGE, SubmitError, SubmitResult};
pub use relative_time::format_relative;
pub use resolver::ProjectResolver;
pub use route::Route;
pub use site::Site;
pub use splash::{SESSION_COOKIE, SPLASH_COOKIE, SplashGate};
pub use synchronizer::{PortfolioSynchronizer, PortfolioView, SyncOutcome, SyncReport};
pub use typewriter::{Phase, Typewriter};
