//! Local free-text analysis.
//!
//! Derives specificity and depth signals from an answer using keyword
//! pattern counts. These are the deterministic metrics the response scorer
//! blends when no richer analysis arrived with the response.

use regex::Regex;

const TECHNICAL_TERMS: &str = r"(?i)\b(java|python|javascript|rust|go|react|spring|hibernate|docker|kubernetes|aws|azure|git|sql|nosql|api|rest|graphql|microservices|agile|scrum)\b";
const EXPERIENCE_INDICATORS: &str =
    r"(?i)\b(years?|months?|experience|worked|developed|built|implemented|managed|led|team)\b";
const CONFIDENCE_INDICATORS: &str = r"(?i)\b(confident|expert|proficient|experienced|knowledgeable|comfortable|familiar|beginner|novice|learning)\b";

const EXAMPLE_MARKERS: [&str; 4] = ["for example", "such as", "like", "specifically"];
const PROCESS_MARKERS: [&str; 4] = ["process", "approach", "method", "strategy"];

/// Metrics derived from one free-text answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMetrics {
    pub word_count: u32,
    pub char_count: u32,
    pub specificity: f64,
    pub depth: f64,
    pub keywords: Vec<String>,
}

/// Compiled keyword patterns. Build once and reuse.
#[derive(Debug)]
pub struct TextAnalyzer {
    technical: Regex,
    experience: Regex,
    confidence: Regex,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer {
    pub fn new() -> Self {
        TextAnalyzer {
            technical: Regex::new(TECHNICAL_TERMS).expect("hardcoded pattern"),
            experience: Regex::new(EXPERIENCE_INDICATORS).expect("hardcoded pattern"),
            confidence: Regex::new(CONFIDENCE_INDICATORS).expect("hardcoded pattern"),
        }
    }

    /// Analyze an answer. Empty or whitespace-only text yields zeroed
    /// metrics rather than an error.
    pub fn analyze(&self, text: &str) -> TextMetrics {
        if text.trim().is_empty() {
            return TextMetrics::default();
        }

        let lower = text.to_lowercase();
        let word_count = text.split_whitespace().count() as u32;
        let char_count = text.chars().count() as u32;

        let technical = self.technical.find_iter(&lower).count();
        let experience = self.experience.find_iter(&lower).count();
        let confidence = self.confidence.find_iter(&lower).count();

        TextMetrics {
            word_count,
            char_count,
            specificity: specificity(&lower, word_count, technical, experience),
            depth: depth(&lower, word_count, technical, confidence),
            keywords: self.keywords(&lower),
        }
    }

    fn keywords(&self, lower: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for pattern in [&self.technical, &self.experience, &self.confidence] {
            for m in pattern.find_iter(lower) {
                let keyword = m.as_str().to_string();
                if !found.contains(&keyword) {
                    found.push(keyword);
                }
            }
        }
        found
    }
}

fn specificity(lower: &str, word_count: u32, technical: usize, experience: usize) -> f64 {
    let mut score = (technical as f64 * 0.1).min(0.4);
    score += (experience as f64 * 0.1).min(0.3);
    if EXAMPLE_MARKERS.iter().any(|m| lower.contains(m)) {
        score += 0.2;
    }
    if word_count > 50 {
        score += 0.1;
    }
    score.min(1.0)
}

fn depth(lower: &str, word_count: u32, technical: usize, confidence: usize) -> f64 {
    let mut score = if word_count > 100 {
        0.3
    } else if word_count > 50 {
        0.2
    } else if word_count > 20 {
        0.1
    } else {
        0.0
    };
    if technical > 2 {
        score += 0.2;
    }
    if PROCESS_MARKERS.iter().any(|m| lower.contains(m)) {
        score += 0.2;
    }
    score += (confidence as f64 * 0.1).min(0.3);
    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_zeroed_metrics() {
        let analyzer = TextAnalyzer::new();
        assert_eq!(analyzer.analyze(""), TextMetrics::default());
        assert_eq!(analyzer.analyze("   \n\t"), TextMetrics::default());
    }

    #[test]
    fn terse_answer_scores_low() {
        let analyzer = TextAnalyzer::new();
        let metrics = analyzer.analyze("I don't know.");
        assert!(metrics.specificity < 0.2);
        assert!(metrics.depth < 0.2);
        assert_eq!(metrics.word_count, 3);
    }

    #[test]
    fn detailed_technical_answer_scores_high() {
        let analyzer = TextAnalyzer::new();
        let text = "I am confident with Docker and Kubernetes after five years of \
                    experience. I built a microservices platform on AWS, such as an \
                    API gateway backed by SQL storage. Our approach was to split the \
                    deployment process into stages, and I led the team that developed \
                    the rollout method. For example, we implemented canary releases \
                    and managed the migration while learning from each incident to \
                    stay comfortable operating the platform at scale over the months.";
        let metrics = analyzer.analyze(text);
        assert!(metrics.specificity >= 0.7, "got {}", metrics.specificity);
        assert!(metrics.depth >= 0.6, "got {}", metrics.depth);
        assert!(metrics.keywords.iter().any(|k| k == "docker"));
        assert!(metrics.keywords.iter().any(|k| k == "experience"));
    }

    #[test]
    fn sub_scores_capped() {
        let analyzer = TextAnalyzer::new();
        // Saturate every pattern; both scores must still respect their caps.
        let text = "java python javascript rust go react spring docker kubernetes aws \
                    years months experience worked developed built implemented managed \
                    confident expert proficient experienced knowledgeable comfortable \
                    process approach method strategy for example such as"
            .repeat(6);
        let metrics = analyzer.analyze(&text);
        assert!(metrics.specificity <= 1.0);
        assert!(metrics.depth <= 1.0);
    }
}
