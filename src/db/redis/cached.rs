use crate::{
    cached,
    db::store::{GenreStore, RankingStore},
    error::AppResult,
    models::{Genre, RankingEntry},
};

use super::{Cache, CacheKey};

/// Read-through Redis cache in front of the small, rarely edited collections
pub struct CachedStore<S> {
    inner: S,
    cache: Cache,
    ttl: u64,
}

impl<S> CachedStore<S> {
    pub fn new(inner: S, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait::async_trait]
impl<S: RankingStore> RankingStore for CachedStore<S> {
    async fn fetch_all(&self) -> AppResult<Vec<RankingEntry>> {
        cached!(self.cache, CacheKey::Rankings, self.ttl, async {
            self.inner.fetch_all().await
        })
    }
}

#[async_trait::async_trait]
impl<S: GenreStore> GenreStore for CachedStore<S> {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        cached!(self.cache, CacheKey::Genres, self.ttl, async {
            self.inner.list_genres().await
        })
    }
}
