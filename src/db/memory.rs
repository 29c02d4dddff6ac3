use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{GenreStore, MovieStore, RankingStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{Genre, Movie, Ranking, RankingEntry, Role, User},
};

/// In-process store holding every collection behind one lock
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
    offline: Arc<AtomicBool>,
}

#[derive(Default)]
struct MemoryStoreInner {
    rankings: Vec<RankingEntry>,
    movies: Vec<Movie>,
    users: Vec<User>,
    genres: Vec<Genre>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StorageUnavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::StorageUnavailable(
                "memory store is offline".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn add_ranking(&self, entry: RankingEntry) {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.rankings.iter_mut().find(|r| r.label == entry.label) {
            existing.rank_value = entry.rank_value;
        } else {
            inner.rankings.push(entry);
        }
    }

    pub async fn add_genre(&self, genre: Genre) {
        let mut inner = self.inner.write().await;
        if !inner.genres.iter().any(|g| g.genre_id == genre.genre_id) {
            inner.genres.push(genre);
        }
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait::async_trait]
impl RankingStore for MemoryStore {
    async fn fetch_all(&self) -> AppResult<Vec<RankingEntry>> {
        self.check_online()?;
        Ok(self.inner.read().await.rankings.clone())
    }
}

#[async_trait::async_trait]
impl MovieStore for MemoryStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        self.check_online()?;
        Ok(self.inner.read().await.movies.clone())
    }

    async fn find_movie(&self, imdb_id: &str) -> AppResult<Option<Movie>> {
        self.check_online()?;
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().find(|m| m.imdb_id == imdb_id).cloned())
    }

    async fn insert_movie(&self, movie: &Movie) -> AppResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        if inner.movies.iter().any(|m| m.imdb_id == movie.imdb_id) {
            return Err(AppError::Conflict(format!(
                "Movie {} already exists",
                movie.imdb_id
            )));
        }
        inner.movies.push(movie.clone());
        Ok(())
    }

    async fn update_review(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> AppResult<bool> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        match inner.movies.iter_mut().find(|m| m.imdb_id == imdb_id) {
            Some(movie) => {
                movie.admin_review = Some(admin_review.to_string());
                movie.ranking = Some(ranking.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_genres(&self, genre_names: &[String], limit: i64) -> AppResult<Vec<Movie>> {
        self.check_online()?;
        let inner = self.inner.read().await;
        let mut matches: Vec<Movie> = inner
            .movies
            .iter()
            .filter(|m| m.has_any_genre(genre_names))
            .cloned()
            .collect();

        // None < Some(_), so unranked movies sort first; the sort is stable
        matches.sort_by_key(|m| m.rank_value());
        matches.truncate(limit.max(0) as usize);
        Ok(matches)
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.check_online()?;
        Ok(self.inner.read().await.users.iter().any(|u| u.email == email))
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.check_online()?;
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        self.check_online()?;
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn favorite_genres(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.check_online()?;
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(User::favorite_genre_names)
            .unwrap_or_default())
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> AppResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.iter_mut().find(|u| u.user_id == user_id) {
            user.token = token.map(String::from);
            user.refresh_token = refresh_token.map(String::from);
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl GenreStore for MemoryStore {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.check_online()?;
        Ok(self.inner.read().await.genres.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(imdb_id: &str, genre: &str, rank: Option<i32>) -> Movie {
        Movie {
            imdb_id: imdb_id.to_string(),
            title: format!("Movie {}", imdb_id),
            poster_path: None,
            youtube_id: None,
            genres: vec![Genre::new(1, genre)],
            admin_review: None,
            ranking: rank.map(|v| Ranking {
                ranking_value: v,
                ranking_name: format!("rank-{}", v),
            }),
        }
    }

    #[tokio::test]
    async fn test_find_by_genres_orders_unranked_first() {
        let store = MemoryStore::new();
        store.insert_movie(&movie("tt3", "Drama", Some(3))).await.unwrap();
        store.insert_movie(&movie("tt1", "Drama", Some(1))).await.unwrap();
        store.insert_movie(&movie("tt0", "Drama", None)).await.unwrap();
        store.insert_movie(&movie("tt9", "Comedy", Some(0))).await.unwrap();

        let found = store
            .find_by_genres(&["Drama".to_string()], 10)
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt0", "tt1", "tt3"]);
    }

    #[tokio::test]
    async fn test_find_by_genres_respects_limit() {
        let store = MemoryStore::new();
        for i in 0..4 {
            store
                .insert_movie(&movie(&format!("tt{}", i), "Drama", Some(i)))
                .await
                .unwrap();
        }
        let found = store.find_by_genres(&["Drama".to_string()], 2).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_duplicate_movie_conflicts() {
        let store = MemoryStore::new();
        store.insert_movie(&movie("tt1", "Drama", None)).await.unwrap();
        let err = store.insert_movie(&movie("tt1", "Drama", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_review_unknown_movie() {
        let store = MemoryStore::new();
        let ranking = Ranking {
            ranking_value: 1,
            ranking_name: "Excellent".to_string(),
        };
        assert!(!store.update_review("tt404", "meh", &ranking).await.unwrap());
    }

    #[tokio::test]
    async fn test_favorite_genres_unknown_user_is_empty() {
        let store = MemoryStore::new();
        assert!(store.favorite_genres("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_rankings_keep_insertion_order() {
        let store = MemoryStore::new();
        store.add_ranking(RankingEntry::new("Excellent", 1)).await;
        store.add_ranking(RankingEntry::new("Bad", 4)).await;
        store.add_ranking(RankingEntry::new("Excellent", 2)).await;

        let entries = store.fetch_all().await.unwrap();
        assert_eq!(
            entries,
            vec![RankingEntry::new("Excellent", 2), RankingEntry::new("Bad", 4)]
        );
    }
}
