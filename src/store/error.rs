//! Error types for the movie store.

use std::time::Duration;

use thiserror::Error;

use super::object_id::{ObjectId, ParseObjectIdError};

/// Errors that can occur during movie store operations.
#[derive(Error, Debug)]
pub enum MovieError {
    #[error("Invalid JSON body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    InvalidId(#[from] ParseObjectIdError),

    #[error("Movie not found: {0}")]
    NotFound(ObjectId),

    #[error("Duplicate key: a movie with id {0} already exists")]
    DuplicateId(ObjectId),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Document encoding error: {0}")]
    Encoding(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Database not initialized at {0}")]
    NotInitialized(String),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Store task failed: {0}")]
    Task(String),
}

/// Coarse classification of a [`MovieError`], as reported to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request body was not a valid movie JSON object.
    BadRequest,
    /// A path or body identifier was not a well-formed id.
    InvalidId,
    /// No movie has the requested id. Only raised by single-record reads.
    NotFound,
    /// Any connectivity, query or write failure in the store.
    Store,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::InvalidId => "INVALID_ID",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Store => "STORE_ERROR",
        }
    }
}

impl MovieError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MovieError::BadRequest(_) => ErrorKind::BadRequest,
            MovieError::InvalidId(_) => ErrorKind::InvalidId,
            MovieError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Store,
        }
    }

    /// Returns `true` if no movie matched the requested id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MovieError::NotFound(_))
    }
}
