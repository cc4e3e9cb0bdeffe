//! Movie collection handlers.

use axum::{Json, body::Bytes, extract::State};
use tracing::{debug, info, instrument};

use crate::store::{DeleteResult, InsertResult, Movie, MovieInput, UpdateResult};

use super::super::{
    error::ApiError,
    extract::{MovieId, MovieName},
    state::AppState,
};

/// List every movie.
#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, ApiError> {
    debug!("listing movies");

    let movies = state.store().list_all()?;

    info!(count = movies.len(), "listed movies");
    Ok(Json(movies))
}

/// Get a single movie by id.
#[instrument(skip(state), fields(id = %id))]
pub async fn get_movie(
    State(state): State<AppState>,
    MovieId(id): MovieId,
) -> Result<Json<Movie>, ApiError> {
    debug!("getting movie");

    let movie = state.get_movie(id).await?;

    info!("retrieved movie");
    Ok(Json(movie))
}

/// Insert a movie from a JSON body.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn create_movie(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<InsertResult>, ApiError> {
    debug!("creating movie");

    let input = MovieInput::from_json(&body)?;
    let result = state.store().create(input)?;

    info!(id = %result.inserted_id, "created movie");
    Ok(Json(result))
}

/// Delete a movie by id. Unknown ids succeed with a zero count.
#[instrument(skip(state), fields(id = %id))]
pub async fn delete_movie(
    State(state): State<AppState>,
    MovieId(id): MovieId,
) -> Result<Json<DeleteResult>, ApiError> {
    debug!("deleting movie");

    let result = state.store().delete_by_id(&id)?;

    info!(deleted = result.deleted_count, "deleted movie");
    Ok(Json(result))
}

/// Overwrite a movie's name, description and cover image.
#[instrument(skip(state, body), fields(id = %id, body_len = body.len()))]
pub async fn update_movie(
    State(state): State<AppState>,
    MovieId(id): MovieId,
    body: Bytes,
) -> Result<Json<UpdateResult>, ApiError> {
    debug!("updating movie");

    let input = MovieInput::from_json(&body)?;
    let result = state.store().update_fields(&id, input.fields)?;

    info!(
        matched = result.matched_count,
        modified = result.modified_count,
        "updated movie"
    );
    Ok(Json(result))
}

/// Find movies whose name matches exactly.
#[instrument(skip(state), fields(name = %name))]
pub async fn search_by_name(
    State(state): State<AppState>,
    MovieName(name): MovieName,
) -> Result<Json<Vec<Movie>>, ApiError> {
    debug!("searching movies by name");

    let movies = state.store().find_by_name(&name)?;

    info!(count = movies.len(), "found movies");
    Ok(Json(movies))
}
