use crate::{
    error::{AppError, AppResult},
    models::RankingEntry,
};

/// Token in the prompt template replaced by the allowed labels
pub const RANKINGS_PLACEHOLDER: &str = "{rankings}";

/// Renders the classification prompt from the configured template.
///
/// The template is checked at render time, so a missing or broken template
/// only fails the classification request that needed it.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: Option<String>,
}

impl PromptBuilder {
    pub fn new(template: Option<String>) -> Self {
        Self { template }
    }

    /// Labels the completion model may choose from, in vocabulary order.
    ///
    /// Entries carrying the sentinel rank are never offered.
    pub fn allowed_labels(entries: &[RankingEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter(|e| e.is_selectable())
            .map(|e| e.label.as_str())
            .collect()
    }

    /// Substitutes the comma-joined labels into the template.
    ///
    /// The review text is appended by the caller, never templated.
    pub fn build(&self, allowed_labels: &[&str]) -> AppResult<String> {
        let template = self
            .template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigurationMissing("BASE_PROMPT_TEMPLATE is not set".to_string())
            })?;

        render(template, allowed_labels)
    }
}

fn render(template: &str, allowed_labels: &[&str]) -> AppResult<String> {
    if !template.contains(RANKINGS_PLACEHOLDER) {
        return Err(AppError::ConfigurationMissing(format!(
            "BASE_PROMPT_TEMPLATE has no {} placeholder",
            RANKINGS_PLACEHOLDER
        )));
    }

    Ok(template.replacen(RANKINGS_PLACEHOLDER, &allowed_labels.join(","), 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SENTINEL_RANK;

    fn vocabulary() -> Vec<RankingEntry> {
        vec![
            RankingEntry::new("Positive", 1),
            RankingEntry::new("Negative", 2),
            RankingEntry::new("Unknown", SENTINEL_RANK),
        ]
    }

    #[test]
    fn test_allowed_labels_skip_sentinel() {
        let entries = vocabulary();
        assert_eq!(
            PromptBuilder::allowed_labels(&entries),
            vec!["Positive", "Negative"]
        );
    }

    #[test]
    fn test_build_renders_labels() {
        let entries = vocabulary();
        let builder = PromptBuilder::new(Some("Choose one of: {rankings}. Review: ".to_string()));

        let prompt = builder
            .build(&PromptBuilder::allowed_labels(&entries))
            .unwrap();

        assert_eq!(prompt, "Choose one of: Positive,Negative. Review: ");
        assert!(!prompt.contains("Unknown"));
    }

    #[test]
    fn test_every_label_appears_once() {
        let entries: Vec<RankingEntry> = (1..=8)
            .map(|i| RankingEntry::new(format!("Label{}", i), i))
            .chain(std::iter::once(RankingEntry::new("Hidden", SENTINEL_RANK)))
            .collect();
        let builder = PromptBuilder::new(Some("[{rankings}]".to_string()));

        let prompt = builder
            .build(&PromptBuilder::allowed_labels(&entries))
            .unwrap();
        let inner = prompt.trim_start_matches('[').trim_end_matches(']');
        let labels: Vec<&str> = inner.split(',').collect();

        assert_eq!(labels.len(), 8);
        for i in 1..=8 {
            let label = format!("Label{}", i);
            assert_eq!(labels.iter().filter(|l| **l == label).count(), 1);
        }
        assert!(!prompt.contains("Hidden"));
        assert!(!prompt.ends_with(",]"));
    }

    #[test]
    fn test_only_first_placeholder_replaced() {
        let builder = PromptBuilder::new(Some("{rankings} then {rankings}".to_string()));
        let prompt = builder.build(&["Good", "Bad"]).unwrap();
        assert_eq!(prompt, "Good,Bad then {rankings}");
    }

    #[test]
    fn test_empty_label_set_renders_empty_list() {
        let builder = PromptBuilder::new(Some("Labels: {rankings}.".to_string()));
        assert_eq!(builder.build(&[]).unwrap(), "Labels: .");
    }

    #[test]
    fn test_missing_template() {
        let err = PromptBuilder::new(None).build(&["Good"]).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing(_)));

        let err = PromptBuilder::new(Some("   ".to_string()))
            .build(&["Good"])
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing(_)));
    }

    #[test]
    fn test_template_without_placeholder() {
        let err = PromptBuilder::new(Some("Classify this review: ".to_string()))
            .build(&["Good"])
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing(_)));
    }
}
