//! Deterministic lexical similarity scorer.
//!
//! Token-overlap (Jaccard) similarity over lowercased alphanumeric tokens.
//! Needs no network and never errors, which makes it the natural scorer
//! for offline runs and the simulate harness.

use std::collections::HashSet;

use async_trait::async_trait;

use skillforge_core::traits::SemanticScorer;

#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

fn tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl SemanticScorer for LexicalScorer {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn similarity(&self, expected: &str, actual: &str) -> anyhow::Result<Option<f64>> {
        let expected = tokens(expected);
        if expected.is_empty() {
            return Ok(None);
        }
        let actual = tokens(actual);
        if actual.is_empty() {
            return Ok(Some(0.0));
        }

        let intersection = expected.intersection(&actual).count();
        let union = expected.union(&actual).count();
        Ok(Some(intersection as f64 / union as f64))
    }
}
