use serde::{Deserialize, Serialize};

use super::Ranking;
use crate::error::{AppError, AppResult};

/// A catalog genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    #[serde(default)]
    pub genre_id: i32,
    pub genre_name: String,
}

impl Genre {
    pub fn new(genre_id: i32, genre_name: impl Into<String>) -> Self {
        Self {
            genre_id,
            genre_name: genre_name.into(),
        }
    }
}

/// Represents a movie in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(rename = "genre", default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub admin_review: Option<String>,
    #[serde(default)]
    pub ranking: Option<Ranking>,
}

impl Movie {
    /// Whether any of this movie's genres is in `names`
    pub fn has_any_genre(&self, names: &[String]) -> bool {
        self.genres.iter().any(|g| names.contains(&g.genre_name))
    }

    pub fn rank_value(&self) -> Option<i32> {
        self.ranking.as_ref().map(|r| r.ranking_value)
    }
}

/// Request body for adding a movie
#[derive(Debug, Clone, Deserialize)]
pub struct NewMovie {
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(rename = "genre", default)]
    pub genres: Vec<Genre>,
}

impl NewMovie {
    pub fn validate(&self) -> AppResult<()> {
        if self.imdb_id.trim().is_empty() {
            return Err(AppError::InvalidInput("imdb_id is required".to_string()));
        }
        let title_len = self.title.trim().chars().count();
        if !(2..=500).contains(&title_len) {
            return Err(AppError::InvalidInput(
                "title must be between 2 and 500 characters".to_string(),
            ));
        }
        if self.genres.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one genre is required".to_string(),
            ));
        }
        if self.genres.iter().any(|g| g.genre_name.trim().is_empty()) {
            return Err(AppError::InvalidInput(
                "genre_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// New movies enter the catalog unreviewed and unranked
    pub fn into_movie(self) -> Movie {
        Movie {
            imdb_id: self.imdb_id.trim().to_string(),
            title: self.title.trim().to_string(),
            poster_path: self.poster_path,
            youtube_id: self.youtube_id,
            genres: self.genres,
            admin_review: None,
            ranking: None,
        }
    }
}

/// Request body for the admin review update
#[derive(Debug, Clone, Deserialize)]
pub struct AdminReviewRequest {
    pub admin_review: String,
}

/// Response for the admin review update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminReviewResponse {
    pub ranking_name: String,
    pub admin_review: String,
}
