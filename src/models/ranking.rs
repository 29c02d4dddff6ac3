use serde::{Deserialize, Serialize};

/// Rank value reserved for the non-selectable "unknown" label
pub const SENTINEL_RANK: i32 = 999;

/// One label of the ranking vocabulary and its numeric rank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankingEntry {
    #[serde(rename = "ranking_name")]
    pub label: String,
    #[serde(rename = "ranking_value")]
    pub rank_value: i32,
}

impl RankingEntry {
    pub fn new(label: impl Into<String>, rank_value: i32) -> Self {
        Self {
            label: label.into(),
            rank_value,
        }
    }

    /// Whether the classifier may offer this label to the completion model
    pub fn is_selectable(&self) -> bool {
        self.rank_value != SENTINEL_RANK
    }
}

/// Ranking stored on a movie once an admin review has been classified
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ranking {
    pub ranking_value: i32,
    pub ranking_name: String,
}

/// Outcome of classifying a review: the label to persist and its resolved rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: String,
    /// 0 when the label did not resolve against the vocabulary
    pub rank: i32,
}

impl Classification {
    pub fn is_resolved(&self) -> bool {
        self.rank != 0
    }
}

impl From<Classification> for Ranking {
    fn from(c: Classification) -> Self {
        Ranking {
            ranking_value: c.rank,
            ranking_name: c.label,
        }
    }
}

/// Per-call admin review update, never persisted as such
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub movie_id: String,
    pub review_text: String,
}
