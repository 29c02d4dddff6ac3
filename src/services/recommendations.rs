use std::sync::Arc;

use tracing::instrument;

use crate::{
    db::{MovieStore, UserStore},
    error::AppResult,
    models::Movie,
};

/// Default number of recommended movies
pub const DEFAULT_LIMIT: i64 = 5;

/// Rank-ordered, genre-filtered movie recommendations.
///
/// Movies are matched on the user's favorite genres and returned ascending by
/// rank value, so better-ranked movies come first. Unranked movies sort ahead
/// of ranked ones, as the document store this replaces ordered nulls lowest.
#[derive(Clone)]
pub struct RecommendationQuery {
    users: Arc<dyn UserStore>,
    movies: Arc<dyn MovieStore>,
    limit: i64,
}

impl RecommendationQuery {
    pub fn new(users: Arc<dyn UserStore>, movies: Arc<dyn MovieStore>, limit: i64) -> Self {
        let limit = if limit > 0 { limit } else { DEFAULT_LIMIT };
        Self {
            users,
            movies,
            limit,
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Recommendations for `user_id` using the configured limit
    pub async fn recommend(&self, user_id: &str) -> AppResult<Vec<Movie>> {
        self.recommend_with_limit(user_id, self.limit).await
    }

    /// An unknown user and a user without favorite genres both get an empty list
    #[instrument(skip(self))]
    pub async fn recommend_with_limit(&self, user_id: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let genres = self.users.favorite_genres(user_id).await?;
        if genres.is_empty() {
            tracing::debug!("No favorite genres, nothing to recommend");
            return Ok(Vec::new());
        }

        let movies = self.movies.find_by_genres(&genres, limit).await?;

        tracing::info!(
            genres = genres.len(),
            results = movies.len(),
            "Recommendations computed"
        );

        Ok(movies)
    }
}
