//! Adaptive next-question selection.
//!
//! Scores every unanswered candidate with a composite information-value
//! heuristic and picks the argmax. The first few questions of a session
//! skip scoring entirely to bound start-up latency.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use uuid::Uuid;

use crate::beliefs::BeliefStore;
use crate::graph::SkillGraph;
use crate::model::{Question, Skill, SkillCategory};

/// Composite score weights and phase thresholds.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Answered count below which selection is random.
    pub warm_up_answered: usize,
    /// Warm-up picks uniformly from the first `min(window, pool)` candidates.
    pub warm_up_window: usize,
    pub uncertainty_weight: f64,
    pub structural_weight: f64,
    pub difficulty_weight: f64,
    pub diversity_weight: f64,
    /// How many recent topics the diversity heuristic looks at.
    pub recent_window: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            warm_up_answered: 3,
            warm_up_window: 10,
            uncertainty_weight: 0.4,
            structural_weight: 0.3,
            difficulty_weight: 0.2,
            diversity_weight: 0.1,
            recent_window: 3,
        }
    }
}

/// Everything the selector reads. Assembled by the engine per call.
pub struct SelectionContext<'a> {
    pub session_id: Uuid,
    pub target_role: Option<&'a str>,
    pub questions: &'a [Question],
    pub skills: &'a HashMap<String, Skill>,
    pub answered: &'a HashSet<u64>,
    /// Diversity keys of the most recently answered questions, oldest first.
    pub recent_topics: &'a [String],
    pub graph: &'a SkillGraph,
    pub beliefs: &'a BeliefStore,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionSelector {
    config: SelectorConfig,
}

impl QuestionSelector {
    pub fn new(config: SelectorConfig) -> Self {
        QuestionSelector { config }
    }

    /// Pick the next question, or `None` when the pool is exhausted.
    pub fn select<'a>(&self, ctx: &SelectionContext<'a>) -> Option<&'a Question> {
        let pool = self.candidate_pool(ctx);
        if pool.is_empty() {
            tracing::info!(session = %ctx.session_id, "no unanswered candidates left");
            return None;
        }

        if ctx.answered.len() < self.config.warm_up_answered {
            let window = pool.len().min(self.config.warm_up_window);
            return Some(pool[rand::thread_rng().gen_range(0..window)]);
        }

        self.select_adaptive(&pool, ctx).or_else(|| fallback(&pool))
    }

    /// Same scoring as [`QuestionSelector::select`], returning the best
    /// `count` candidates in descending score order.
    pub fn top_n<'a>(&self, ctx: &SelectionContext<'a>, count: usize) -> Vec<&'a Question> {
        let pool = self.candidate_pool(ctx);
        let mut scored: Vec<(&Question, f64)> = pool
            .into_iter()
            .map(|q| (q, self.score(q, ctx)))
            .collect();
        // Stable sort keeps catalog order among ties.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(count).map(|(q, _)| q).collect()
    }

    /// Catalog filtered by target role (falling back to the unfiltered
    /// catalog when the filter empties the pool), minus answered ids.
    fn candidate_pool<'a>(&self, ctx: &SelectionContext<'a>) -> Vec<&'a Question> {
        let mut available: Vec<&Question> = ctx.questions.iter().collect();

        if let Some(role) = ctx.target_role {
            let filtered = role_filtered(ctx.questions, ctx.skills, &role.to_lowercase());
            if !filtered.is_empty() {
                available = filtered;
            }
        }

        available
            .into_iter()
            .filter(|q| !ctx.answered.contains(&q.id))
            .collect()
    }

    fn select_adaptive<'a>(
        &self,
        pool: &[&'a Question],
        ctx: &SelectionContext<'_>,
    ) -> Option<&'a Question> {
        let mut best: Option<(&Question, f64)> = None;
        for question in pool {
            let score = self.score(question, ctx);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((question, score)),
            }
        }
        best.map(|(q, _)| q)
    }

    /// Composite candidate score. A per-candidate failure (dangling skill
    /// reference) degrades to the neutral 0.5 so one bad row cannot abort
    /// selection.
    fn score(&self, question: &Question, ctx: &SelectionContext<'_>) -> f64 {
        if question.skill.trim().is_empty() || !ctx.skills.contains_key(&question.skill) {
            tracing::warn!(
                question = question.id,
                skill = %question.skill,
                "question references unknown skill, using neutral score"
            );
            return 0.5;
        }

        let belief = ctx.beliefs.belief_of(ctx.session_id, &question.skill);
        let uncertainty = (belief - 0.5).abs() * 2.0;
        let mut score = self.config.uncertainty_weight * uncertainty;

        let structural = match ctx.graph.level(&question.skill) {
            Some(level) if level > 0 => 1.0 / level as f64,
            _ => 1.0,
        };
        score += self.config.structural_weight * structural;

        let difficulty = question.difficulty_scalar();
        score += self.config.difficulty_weight * (1.0 - (difficulty - 0.5).abs() * 2.0);

        score += self.config.diversity_weight * self.type_diversity(question, ctx);
        score
    }

    /// 0 when the candidate's topic matches more than one of the recently
    /// answered topics, 0.5 otherwise (and while history is short).
    fn type_diversity(&self, question: &Question, ctx: &SelectionContext<'_>) -> f64 {
        if ctx.recent_topics.len() < self.config.recent_window {
            return 0.5;
        }
        let key = question.diversity_key();
        let repeats = ctx
            .recent_topics
            .iter()
            .rev()
            .take(self.config.recent_window)
            .filter(|topic| topic.as_str() == key)
            .count();
        if repeats > 1 {
            0.0
        } else {
            0.5
        }
    }
}

/// Last-resort selection when adaptive scoring produced nothing: a random
/// mcq candidate, then any random candidate.
fn fallback<'a>(pool: &[&'a Question]) -> Option<&'a Question> {
    let mut rng = rand::thread_rng();
    let mcq: Vec<&Question> = pool.iter().copied().filter(|q| q.kind.is_mcq()).collect();
    if !mcq.is_empty() {
        return Some(mcq[rng.gen_range(0..mcq.len())]);
    }
    if pool.is_empty() {
        None
    } else {
        Some(pool[rng.gen_range(0..pool.len())])
    }
}

/// Questions whose skill matches a (lowercased) target role.
pub(crate) fn role_filtered<'a>(
    questions: &'a [Question],
    skills: &HashMap<String, Skill>,
    role: &str,
) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| role_matches(skills.get(&q.skill), role))
        .collect()
}

fn role_matches(skill: Option<&Skill>, role: &str) -> bool {
    let Some(skill) = skill else {
        return false;
    };
    if skill.category.as_str().contains(role)
        || skill.code.to_lowercase().contains(role)
        || skill.display_name.to_lowercase().contains(role)
    {
        return true;
    }
    // Common mapping: software engineer/developer roles map to the
    // programming category.
    (role.contains("engineer") || role.contains("developer"))
        && skill.category == SkillCategory::Programming
}
