use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{error::AppResult, models::Genre, services::catalog, state::AppState};

pub async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    let genres = catalog::list_genres(state.genres.as_ref()).await?;
    Ok(Json(genres))
}
