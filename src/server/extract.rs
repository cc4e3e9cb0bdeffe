//! Path extractors that reject with JSON [`ApiError`] bodies.

use axum::{
    extract::{FromRequestParts, Path, rejection::PathRejection},
    http::{StatusCode, request::Parts},
};

use crate::store::{ErrorKind, ObjectId};

use super::error::ApiError;

/// A movie id taken from the request path.
pub struct MovieId(pub ObjectId);

impl<S> FromRequestParts<S> for MovieId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| path_error(ErrorKind::InvalidId, rejection))?;
        Ok(MovieId(raw.parse()?))
    }
}

/// A movie name taken from the request path, percent-decoded.
pub struct MovieName(pub String);

impl<S> FromRequestParts<S> for MovieName
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| path_error(ErrorKind::BadRequest, rejection))?;
        Ok(MovieName(name))
    }
}

fn path_error(kind: ErrorKind, rejection: PathRejection) -> ApiError {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        kind.code(),
        rejection.body_text(),
    )
}
