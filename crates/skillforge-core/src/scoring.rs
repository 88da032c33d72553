//! Converts one answered question into a scalar evidence value in [0, 1].

use crate::model::{Question, QuestionKind, Response};

pub const SPECIFICITY_WEIGHT: f64 = 0.3;
pub const LENGTH_WEIGHT: f64 = 0.4;
pub const DEPTH_WEIGHT: f64 = 0.3;
/// Character count at which the length sub-score saturates.
pub const LENGTH_NORMALIZER: f64 = 500.0;

/// Deterministic local response scoring. Sub-scores default to 0 when
/// unavailable; malformed input yields evidence 0.0 rather than an error.
pub struct ResponseScorer;

impl ResponseScorer {
    pub fn evidence(question: &Question, response: &Response) -> f64 {
        match &question.kind {
            QuestionKind::Mcq { .. } => {
                if response.is_correct == Some(true) {
                    1.0
                } else {
                    0.0
                }
            }
            QuestionKind::Text { .. } => Self::text_evidence(response),
        }
    }

    fn text_evidence(response: &Response) -> f64 {
        let specificity = response.specificity_score.unwrap_or(0.0).clamp(0.0, 1.0);
        let depth = response.depth_score.unwrap_or(0.0).clamp(0.0, 1.0);
        let chars = response
            .char_count
            .map(f64::from)
            .unwrap_or_else(|| response.answer_text.chars().count() as f64);
        let length = (chars / LENGTH_NORMALIZER).min(1.0);

        (SPECIFICITY_WEIGHT * specificity + LENGTH_WEIGHT * length + DEPTH_WEIGHT * depth)
            .clamp(0.0, 1.0)
    }

    /// Grade an mcq answer against the correct option, ignoring case and
    /// surrounding whitespace.
    pub fn grade_mcq(correct_answer: &str, answer_text: &str) -> bool {
        answer_text.trim().eq_ignore_ascii_case(correct_answer.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use uuid::Uuid;

    fn mcq_question() -> Question {
        Question {
            id: 1,
            skill: "rust".into(),
            text: "Which keyword declares an immutable binding?".into(),
            topic: None,
            difficulty: Difficulty::Easy,
            difficulty_override: None,
            kind: QuestionKind::Mcq {
                options: vec!["let".into(), "var".into()],
                correct_answer: "let".into(),
            },
        }
    }

    fn text_question() -> Question {
        Question {
            id: 2,
            skill: "rust".into(),
            text: "Explain ownership".into(),
            topic: None,
            difficulty: Difficulty::Intermediate,
            difficulty_override: None,
            kind: QuestionKind::Text { context_hint: None },
        }
    }

    fn response(answer: &str) -> Response {
        Response::new(Uuid::new_v4(), 1, answer)
    }

    #[test]
    fn mcq_correctness_is_binary() {
        let q = mcq_question();
        let mut r = response("let");
        r.is_correct = Some(true);
        assert_eq!(ResponseScorer::evidence(&q, &r), 1.0);
        r.is_correct = Some(false);
        assert_eq!(ResponseScorer::evidence(&q, &r), 0.0);
        r.is_correct = None;
        assert_eq!(ResponseScorer::evidence(&q, &r), 0.0);
    }

    #[test]
    fn text_blend_matches_weights() {
        let q = text_question();
        let mut r = response("");
        r.specificity_score = Some(0.6);
        r.depth_score = Some(0.5);
        r.char_count = Some(200);
        let evidence = ResponseScorer::evidence(&q, &r);
        // 0.3·0.6 + 0.4·(200/500) + 0.3·0.5 = 0.49
        assert!((evidence - 0.49).abs() < 1e-9, "got {evidence}");
    }

    #[test]
    fn text_length_term_saturates() {
        let q = text_question();
        let mut r = response("");
        r.char_count = Some(5000);
        let evidence = ResponseScorer::evidence(&q, &r);
        assert!((evidence - LENGTH_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let q = text_question();
        let r = response("");
        assert_eq!(ResponseScorer::evidence(&q, &r), 0.0);
    }

    #[test]
    fn out_of_range_metrics_are_clamped() {
        let q = text_question();
        let mut r = response("");
        r.specificity_score = Some(4.0);
        r.depth_score = Some(-2.0);
        r.char_count = Some(0);
        let evidence = ResponseScorer::evidence(&q, &r);
        assert!((evidence - SPECIFICITY_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn grade_mcq_ignores_case_and_whitespace() {
        assert!(ResponseScorer::grade_mcq("let", "  LET "));
        assert!(!ResponseScorer::grade_mcq("let", "var"));
    }
}
