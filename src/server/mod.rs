//! HTTP API server for moviesdb.
//!
//! This module exposes the movie collection over JSON HTTP using axum.
//! The store is constructed once at startup and injected into every handler
//! through [`AppState`].

mod config;
mod error;
mod extract;
mod logging;
mod routes;
mod state;

pub use config::{Config, ConfigError, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig, StoreEngine};
pub use error::ApiError;
pub use logging::{LoggingError, init as init_logging};
pub use routes::router;
pub use state::{AppState, StateError};
