use std::sync::Arc;

use crate::{
    config::Config,
    db::{GenreStore, MovieStore, RankingStore, UserStore},
    services::{
        CompletionClient, PromptBuilder, RankingVocabulary, RecommendationQuery,
        ReviewClassifier, TokenService,
    },
};

/// Storage handles the application is assembled from
#[derive(Clone)]
pub struct Stores {
    pub rankings: Arc<dyn RankingStore>,
    pub movies: Arc<dyn MovieStore>,
    pub users: Arc<dyn UserStore>,
    pub genres: Arc<dyn GenreStore>,
}

impl Stores {
    /// Uses one backend for every collection
    pub fn single<S>(store: S) -> Self
    where
        S: RankingStore + MovieStore + UserStore + GenreStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            rankings: store.clone(),
            movies: store.clone(),
            users: store.clone(),
            genres: store,
        }
    }
}

/// Shared application state, immutable after startup
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: Arc<dyn MovieStore>,
    pub users: Arc<dyn UserStore>,
    pub genres: Arc<dyn GenreStore>,
    pub classifier: ReviewClassifier,
    pub recommender: RecommendationQuery,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: Config, stores: Stores, completion: Arc<dyn CompletionClient>) -> Self {
        let classifier = ReviewClassifier::new(
            RankingVocabulary::new(stores.rankings),
            PromptBuilder::new(config.base_prompt_template.clone()),
            completion,
            config.label_match,
        );
        let recommender = RecommendationQuery::new(
            stores.users.clone(),
            stores.movies.clone(),
            config.recommended_movie_limit,
        );
        let tokens = TokenService::from_config(&config);

        Self {
            config: Arc::new(config),
            movies: stores.movies,
            users: stores.users,
            genres: stores.genres,
            classifier,
            recommender,
            tokens,
        }
    }
}
