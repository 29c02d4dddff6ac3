pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod classifier;
pub mod completion;
pub mod prompt;
pub mod recommendations;
pub mod reviews;
pub mod vocabulary;

pub use auth::{SessionClaims, TokenPair, TokenService};
pub use classifier::ReviewClassifier;
pub use completion::{CompletionClient, OpenRouterClient};
pub use prompt::PromptBuilder;
pub use recommendations::RecommendationQuery;
pub use vocabulary::RankingVocabulary;
