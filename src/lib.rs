//! A small document store for movie records, served over JSON HTTP.
//!
//! # Quick Start
//!
//! ```ignore
//! use moviesdb::prelude::*;
//!
//! let store = FjallStore::init("moviesdb", "movies")?;
//!
//! let input = MovieInput::from_json(br#"{"name": "Inception"}"#)?;
//! let inserted = store.create(input)?;
//!
//! let movie = store.get_by_id(&inserted.inserted_id)?;
//! assert_eq!(movie.name, "Inception");
//! ```
//!
//! # Modules
//!
//! - [`store`] - The [`MovieStore`] trait and its fjall and in-memory implementations
//! - [`server`] - The axum HTTP API (requires `server` feature)
//! - [`prelude`] - Convenient re-exports
//!
//! # Feature Flags
//!
//! - `server` - Enable the HTTP API server and the `moviesdb-server` binary (enabled by default)

pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod store;

pub use store::{
    DeleteResult, ErrorKind, FjallStore, InsertResult, MemoryStore, Movie, MovieError,
    MovieFields, MovieInput, MovieStore, OBJECT_ID_LEN, ObjectId, ParseObjectIdError, UpdateResult,
};
