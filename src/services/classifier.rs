use std::sync::Arc;

use tracing::instrument;

use super::{completion::CompletionClient, prompt::PromptBuilder, vocabulary::RankingVocabulary};
use crate::{
    config::LabelMatch,
    error::AppResult,
    models::{Classification, RankingEntry},
};

/// Turns a free-text admin review into a vocabulary label and rank.
///
/// Pipeline: fetch vocabulary, render prompt, call the completion service,
/// resolve the returned label. Nothing is retried; every failure reaches the
/// caller before anything is persisted.
#[derive(Clone)]
pub struct ReviewClassifier {
    vocabulary: RankingVocabulary,
    prompts: PromptBuilder,
    completion: Arc<dyn CompletionClient>,
    label_match: LabelMatch,
}

impl ReviewClassifier {
    pub fn new(
        vocabulary: RankingVocabulary,
        prompts: PromptBuilder,
        completion: Arc<dyn CompletionClient>,
        label_match: LabelMatch,
    ) -> Self {
        Self {
            vocabulary,
            prompts,
            completion,
            label_match,
        }
    }

    #[instrument(skip_all, fields(review_len = review_text.len(), provider = self.completion.name()))]
    pub async fn classify_review(&self, review_text: &str) -> AppResult<Classification> {
        let entries = self.vocabulary.fetch_all().await?;

        let base_prompt = self
            .prompts
            .build(&PromptBuilder::allowed_labels(&entries))?;

        let mut prompt = base_prompt;
        prompt.push_str(review_text);

        let raw_label = self.completion.classify(&prompt).await?;
        let classification = resolve(&entries, raw_label, self.label_match);

        if classification.is_resolved() {
            tracing::info!(
                label = %classification.label,
                rank = classification.rank,
                "Review classified"
            );
        } else {
            tracing::warn!(
                label = %classification.label,
                "Completion label not in ranking vocabulary, rank defaults to 0"
            );
        }

        Ok(classification)
    }
}

/// Looks the label up in the vocabulary; unknown labels keep rank 0
pub fn resolve(entries: &[RankingEntry], label: String, policy: LabelMatch) -> Classification {
    match policy {
        LabelMatch::Exact => {
            let rank = entries
                .iter()
                .find(|e| e.label == label)
                .map(|e| e.rank_value)
                .unwrap_or(0);
            Classification { label, rank }
        }
        LabelMatch::CaseInsensitive => {
            let wanted = label.trim();
            match entries
                .iter()
                .find(|e| e.label.trim().eq_ignore_ascii_case(wanted))
            {
                Some(entry) => Classification {
                    label: entry.label.clone(),
                    rank: entry.rank_value,
                },
                None => Classification { label, rank: 0 },
            }
        }
    }
}
