#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{router, serve, serve_with_shutdown};
pub use state::AppState;
