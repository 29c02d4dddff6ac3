use std::sync::Arc;

use crate::{db::RankingStore, error::AppResult, models::RankingEntry};

/// The administrator-curated label→rank mapping, fetched per use
#[derive(Clone)]
pub struct RankingVocabulary {
    store: Arc<dyn RankingStore>,
}

impl RankingVocabulary {
    pub fn new(store: Arc<dyn RankingStore>) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self) -> AppResult<Vec<RankingEntry>> {
        let entries = self.store.fetch_all().await?;
        tracing::debug!(entries = entries.len(), "Ranking vocabulary fetched");
        Ok(entries)
    }
}
