use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::AppResult,
    models::{AdminReviewRequest, AdminReviewResponse, ClassificationRequest, Movie, NewMovie},
    services::{catalog, reviews, SessionClaims},
    state::AppState,
};

pub async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Movie>>> {
    let movies = catalog::list_movies(state.movies.as_ref()).await?;
    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = catalog::get_movie(state.movies.as_ref(), &imdb_id).await?;
    Ok(Json(movie))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(new_movie): Json<NewMovie>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let movie = catalog::add_movie(state.movies.as_ref(), new_movie).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// Classifies the admin review and stores it with the resulting ranking
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<SessionClaims>,
    Path(imdb_id): Path<String>,
    Json(request): Json<AdminReviewRequest>,
) -> AppResult<Json<AdminReviewResponse>> {
    let response = reviews::update_admin_review(
        &state.classifier,
        state.movies.as_ref(),
        claims.role,
        ClassificationRequest {
            movie_id: imdb_id,
            review_text: request.admin_review,
        },
    )
    .await?;

    Ok(Json(response))
}
