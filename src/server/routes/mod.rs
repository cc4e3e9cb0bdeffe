//! API routes and handlers.

mod movies;

use axum::{
    Router,
    http::{Method, Uri},
    routing::{get, post},
};

use super::{error::ApiError, state::AppState};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/movies", get(movies::list_movies))
        .route("/movie", post(movies::create_movie))
        .route(
            "/movie/{id}",
            get(movies::get_movie)
                .delete(movies::delete_movie)
                .patch(movies::update_movie),
        )
        .route("/search/movie-name/{name}", get(movies::search_by_name))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(state)
}

/// Health/info endpoint.
async fn home() -> &'static str {
    "Movies Home Page"
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::route_not_found(&method, &uri)
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::method_not_allowed(&method, &uri)
}
