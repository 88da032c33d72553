//! Assessment stopping policy.
//!
//! A pure decision table over counts, elapsed time, and belief coverage.
//! Rules are evaluated in order; the first match wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const MIN_QUESTIONS: usize = 10;
pub const MAX_QUESTIONS: usize = 15;
pub const MAX_TIME_SECONDS: u64 = 2700;
pub const COVERAGE_THRESHOLD: f64 = 0.6;
/// Threshold for the confidence ratio reported in [`StoppingStatus`].
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Why an assessment stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxQuestionsReached,
    TimeLimitExceeded,
    SufficientConfidence,
    GoodCoverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop(StopReason),
}

impl Decision {
    pub fn should_stop(&self) -> bool {
        matches!(self, Decision::Stop(_))
    }

    pub fn reason(&self) -> Option<StopReason> {
        match self {
            Decision::Continue => None,
            Decision::Stop(reason) => Some(*reason),
        }
    }
}

/// Everything the policy looks at. Assembled by the engine from the
/// session's response history and a belief snapshot.
#[derive(Debug, Clone)]
pub struct StoppingInput {
    pub answered_count: usize,
    pub elapsed_seconds: u64,
    pub beliefs: HashMap<String, f64>,
    pub has_target_role: bool,
}

/// Raw ratios behind the decision, exposed for observability independent
/// of the boolean outcome.
#[derive(Debug, Clone, Serialize)]
pub struct StoppingStatus {
    pub answered_count: usize,
    pub min_questions: usize,
    pub max_questions: usize,
    pub elapsed_seconds: u64,
    pub max_time_seconds: u64,
    pub confidence_ratio: f64,
    pub confidence_threshold: f64,
    pub coverage_ratio: f64,
    pub coverage_threshold: f64,
    pub should_stop: bool,
    pub reason: Option<StopReason>,
}

#[derive(Debug, Clone)]
pub struct StoppingPolicy {
    pub min_questions: usize,
    pub max_questions: usize,
    pub max_time_seconds: u64,
    pub coverage_threshold: f64,
}

impl Default for StoppingPolicy {
    fn default() -> Self {
        StoppingPolicy {
            min_questions: MIN_QUESTIONS,
            max_questions: MAX_QUESTIONS,
            max_time_seconds: MAX_TIME_SECONDS,
            coverage_threshold: COVERAGE_THRESHOLD,
        }
    }
}

impl StoppingPolicy {
    pub fn evaluate(&self, input: &StoppingInput) -> Decision {
        if input.answered_count < self.min_questions {
            return Decision::Continue;
        }
        if input.answered_count >= self.max_questions {
            return Decision::Stop(StopReason::MaxQuestionsReached);
        }
        if input.elapsed_seconds > self.max_time_seconds {
            return Decision::Stop(StopReason::TimeLimitExceeded);
        }
        if self.sufficient_confidence(input) {
            return Decision::Stop(StopReason::SufficientConfidence);
        }
        if input.has_target_role && coverage_ratio(&input.beliefs) >= self.coverage_threshold {
            return Decision::Stop(StopReason::GoodCoverage);
        }
        Decision::Continue
    }

    /// Placeholder rule: never fires.
    ///
    /// TODO: define a session-scoped confidence aggregate (the per-skill
    /// confidence values are not part of the snapshot this policy sees)
    /// before enabling this rule.
    fn sufficient_confidence(&self, _input: &StoppingInput) -> bool {
        false
    }

    pub fn status(&self, input: &StoppingInput) -> StoppingStatus {
        let decision = self.evaluate(input);
        StoppingStatus {
            answered_count: input.answered_count,
            min_questions: self.min_questions,
            max_questions: self.max_questions,
            elapsed_seconds: input.elapsed_seconds,
            max_time_seconds: self.max_time_seconds,
            confidence_ratio: confidence_ratio(&input.beliefs),
            confidence_threshold: CONFIDENCE_THRESHOLD,
            coverage_ratio: coverage_ratio(&input.beliefs),
            coverage_threshold: self.coverage_threshold,
            should_stop: decision.should_stop(),
            reason: decision.reason(),
        }
    }
}

/// Share of skills whose belief has moved off the neutral 0.5.
fn coverage_ratio(beliefs: &HashMap<String, f64>) -> f64 {
    if beliefs.is_empty() {
        return 0.0;
    }
    let assessed = beliefs.values().filter(|b| **b != 0.5).count();
    assessed as f64 / beliefs.len() as f64
}

/// Share of skills resolved to either end of the belief axis.
fn confidence_ratio(beliefs: &HashMap<String, f64>) -> f64 {
    if beliefs.is_empty() {
        return 0.0;
    }
    let confident = beliefs
        .values()
        .filter(|b| **b >= CONFIDENCE_THRESHOLD || **b <= 1.0 - CONFIDENCE_THRESHOLD)
        .count();
    confident as f64 / beliefs.len() as f64
}
