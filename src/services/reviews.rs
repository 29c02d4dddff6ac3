use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{AdminReviewResponse, ClassificationRequest, Ranking, Role},
};

use super::classifier::ReviewClassifier;

/// Classifies an admin review and stores it with its ranking.
///
/// The role check runs before any external call. The movie is written once,
/// after classification succeeded; concurrent updates are last-write-wins.
pub async fn update_admin_review(
    classifier: &ReviewClassifier,
    movies: &dyn MovieStore,
    role: Role,
    request: ClassificationRequest,
) -> AppResult<AdminReviewResponse> {
    if role != Role::Admin {
        return Err(AppError::Forbidden(
            "User must be part of the ADMIN role".to_string(),
        ));
    }

    if request.movie_id.trim().is_empty() {
        return Err(AppError::InvalidInput("movieId required".to_string()));
    }

    let classification = classifier.classify_review(&request.review_text).await?;
    let ranking = Ranking::from(classification);

    let matched = movies
        .update_review(&request.movie_id, &request.review_text, &ranking)
        .await?;

    if !matched {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    tracing::info!(
        imdb_id = %request.movie_id,
        ranking_name = %ranking.ranking_name,
        ranking_value = ranking.ranking_value,
        "Admin review updated"
    );

    Ok(AdminReviewResponse {
        ranking_name: ranking.ranking_name,
        admin_review: request.review_text,
    })
}
