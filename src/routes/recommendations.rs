use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{error::AppResult, models::Movie, services::SessionClaims, state::AppState};

/// Handler for recommendations endpoint, keyed by the caller's session
pub async fn recommended(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<SessionClaims>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.recommender.recommend(&claims.user_id).await?;
    Ok(Json(movies))
}
