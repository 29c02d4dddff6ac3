//! Storage seams consumed by the services.
//!
//! Every component receives the stores it needs as `Arc<dyn ...>` at
//! construction time. `PgStore` backs them in production and `MemoryStore`
//! in tests.

use crate::{
    error::AppResult,
    models::{Genre, Movie, Ranking, RankingEntry, User},
};

/// Read access to the administrator-curated ranking vocabulary
#[async_trait::async_trait]
pub trait RankingStore: Send + Sync {
    /// Returns every ranking entry in the store's natural order
    async fn fetch_all(&self) -> AppResult<Vec<RankingEntry>>;
}

#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    async fn find_movie(&self, imdb_id: &str) -> AppResult<Option<Movie>>;

    /// Fails with `Conflict` when the imdb_id already exists
    async fn insert_movie(&self, movie: &Movie) -> AppResult<()>;

    /// Sets the admin review and ranking in one filter-match update.
    ///
    /// Returns `false` when no movie matched `imdb_id`.
    async fn update_review(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> AppResult<bool>;

    /// Movies sharing at least one genre with `genre_names`, ascending by
    /// rank value with unranked movies first, at most `limit` of them
    async fn find_by_genres(&self, genre_names: &[String], limit: i64) -> AppResult<Vec<Movie>>;
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Fails with `Conflict` when the email is already registered
    async fn insert_user(&self, user: &User) -> AppResult<()>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>>;

    /// Favorite genre names; empty when the user is unknown or has none
    async fn favorite_genres(&self, user_id: &str) -> AppResult<Vec<String>>;

    async fn update_tokens(
        &self,
        user_id: &str,
        token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> AppResult<()>;
}

#[async_trait::async_trait]
pub trait GenreStore: Send + Sync {
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
}
