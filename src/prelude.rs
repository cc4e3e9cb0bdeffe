//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use moviesdb::prelude::*;
//!
//! let store = MemoryStore::new();
//! let movies = store.find_by_name("Inception")?;
//! ```

pub use crate::store::{
    DeleteResult, ErrorKind, FjallStore, InsertResult, MemoryStore, Movie, MovieError,
    MovieFields, MovieInput, MovieStore, OBJECT_ID_LEN, ObjectId, ParseObjectIdError, UpdateResult,
};

#[cfg(feature = "server")]
pub use crate::server::{router, ApiError, AppState, Config};
