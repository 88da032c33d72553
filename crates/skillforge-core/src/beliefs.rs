//! Per-session skill beliefs and the evidence-update formulas.
//!
//! Belief state is logically independent across sessions; updates to a
//! single session's rows are serialized behind that session's lock because
//! the update formulas are read-modify-write and not commutative under
//! interleaving.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::CorrelationIndex;
use crate::model::Skill;

/// Confidence assigned to a freshly created belief row.
pub const INITIAL_CONFIDENCE: f64 = 0.5;
/// Weight of a new direct observation against accumulated belief.
pub const DIRECT_EVIDENCE_WEIGHT: f64 = 0.5;
/// Confidence gained per direct observation.
pub const CONFIDENCE_STEP: f64 = 0.1;
/// Damping applied to evidence before it spreads to correlated skills.
pub const PROPAGATION_DAMPING: f64 = 0.5;
/// Weight of propagated evidence against accumulated belief.
pub const PROPAGATION_WEIGHT: f64 = 0.3;
/// Belief in the absence of any signal.
pub const NEUTRAL_BELIEF: f64 = 0.5;
/// Prior for a skill textually matched in resume-verified skills.
pub const RESUME_PRESENT_PRIOR: f64 = 0.8;
/// Prior for a skill absent from resume-verified skills.
pub const RESUME_ABSENT_PRIOR: f64 = 0.2;

/// Belief row for one (session, skill) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillBelief {
    /// Estimated proficiency in [0, 1].
    pub belief: f64,
    /// Trust in the current belief in [0, 1]; grows only under direct
    /// evidence.
    pub confidence: f64,
    /// Contributing response ids, append-only.
    pub evidence: Vec<Uuid>,
}

/// Initial beliefs for a session, optionally seeded from resume-derived
/// verified skills.
#[derive(Debug, Clone, Default)]
pub struct Priors {
    verified: Option<HashSet<String>>,
}

impl Priors {
    /// Neutral priors: 0.5 everywhere.
    pub fn none() -> Self {
        Priors { verified: None }
    }

    /// Resume-seeded priors from a set of verified skill names (matched
    /// case-insensitively, containment in either direction).
    pub fn from_verified(verified: HashSet<String>) -> Self {
        let verified = verified.into_iter().map(|s| s.to_lowercase()).collect();
        Priors {
            verified: Some(verified),
        }
    }

    pub fn prior_for(&self, skill_code: &str) -> f64 {
        let Some(verified) = &self.verified else {
            return NEUTRAL_BELIEF;
        };
        let code = skill_code.to_lowercase();
        let matched = verified
            .iter()
            .any(|skill| skill.contains(&code) || code.contains(skill.as_str()));
        if matched {
            RESUME_PRESENT_PRIOR
        } else {
            RESUME_ABSENT_PRIOR
        }
    }
}

type SessionRows = HashMap<String, SkillBelief>;

/// Per-session map from skill code to belief row.
#[derive(Debug, Default)]
pub struct BeliefStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionRows>>>>,
}

impl BeliefStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn session_rows(&self, session: Uuid) -> Arc<Mutex<SessionRows>> {
        if let Some(rows) = self.sessions.read().unwrap().get(&session) {
            return Arc::clone(rows);
        }
        let mut sessions = self.sessions.write().unwrap();
        Arc::clone(sessions.entry(session).or_default())
    }

    /// Apply direct evidence for `skill`, creating the row on first
    /// observation.
    pub fn record_evidence(&self, session: Uuid, skill: &str, evidence: f64, response: Uuid) {
        let rows = self.session_rows(session);
        let mut rows = rows.lock().unwrap();
        record_evidence_locked(&mut rows, skill, evidence, response);
    }

    /// Spread attenuated evidence from `source` to its correlated skills.
    /// Only existing rows are updated; propagation never creates one.
    pub fn propagate(
        &self,
        session: Uuid,
        source: &str,
        evidence: f64,
        correlations: &CorrelationIndex,
    ) {
        let rows = self.session_rows(session);
        let mut rows = rows.lock().unwrap();
        propagate_locked(&mut rows, source, evidence, correlations);
    }

    /// All-skills view: every catalog skill starts from its prior, and an
    /// existing row blends in as `prior·(1−confidence) + belief·confidence`.
    ///
    /// Note the asymmetry with [`BeliefStore::belief_of`], which never
    /// consults the prior.
    pub fn snapshot(&self, session: Uuid, skills: &[Skill], priors: &Priors) -> HashMap<String, f64> {
        let rows = self.session_rows(session);
        let rows = rows.lock().unwrap();

        skills
            .iter()
            .map(|skill| {
                let prior = priors.prior_for(&skill.code);
                let value = match rows.get(&skill.code) {
                    Some(row) => {
                        (prior * (1.0 - row.confidence) + row.belief * row.confidence)
                            .clamp(0.0, 1.0)
                    }
                    None => prior,
                };
                (skill.code.clone(), value)
            })
            .collect()
    }

    /// Single-skill view: the stored belief when a row exists, else a flat
    /// 0.5. This path intentionally does *not* apply the resume prior; see
    /// [`BeliefStore::snapshot`].
    pub fn belief_of(&self, session: Uuid, skill: &str) -> f64 {
        let rows = self.session_rows(session);
        let rows = rows.lock().unwrap();
        rows.get(skill).map(|row| row.belief).unwrap_or(NEUTRAL_BELIEF)
    }

    /// Clone of the stored row, if direct evidence has created one.
    pub fn row(&self, session: Uuid, skill: &str) -> Option<SkillBelief> {
        let rows = self.session_rows(session);
        let rows = rows.lock().unwrap();
        rows.get(skill).cloned()
    }

    /// Drop all rows owned by a session. Rows are never deleted any other
    /// way.
    pub fn remove_session(&self, session: Uuid) {
        self.sessions.write().unwrap().remove(&session);
    }
}

fn record_evidence_locked(rows: &mut SessionRows, skill: &str, evidence: f64, response: Uuid) {
    let evidence = evidence.clamp(0.0, 1.0);
    match rows.get_mut(skill) {
        None => {
            rows.insert(
                skill.to_string(),
                SkillBelief {
                    belief: evidence,
                    confidence: INITIAL_CONFIDENCE,
                    evidence: vec![response],
                },
            );
        }
        Some(row) => {
            row.belief = ((row.belief * row.confidence + evidence * DIRECT_EVIDENCE_WEIGHT)
                / (row.confidence + DIRECT_EVIDENCE_WEIGHT))
                .clamp(0.0, 1.0);
            row.confidence = (row.confidence + CONFIDENCE_STEP).min(1.0);
            row.evidence.push(response);
        }
    }
}

fn propagate_locked(
    rows: &mut SessionRows,
    source: &str,
    evidence: f64,
    correlations: &CorrelationIndex,
) {
    let Some(correlated) = correlations.correlated(source) else {
        tracing::debug!(skill = %source, "no correlations for skill, nothing to propagate");
        return;
    };
    let evidence = evidence.clamp(0.0, 1.0);
    for (target, weight) in correlated {
        let propagated = evidence * weight * PROPAGATION_DAMPING;
        if let Some(row) = rows.get_mut(target) {
            row.belief = ((row.belief * row.confidence + propagated * PROPAGATION_WEIGHT)
                / (row.confidence + PROPAGATION_WEIGHT))
                .clamp(0.0, 1.0);
        }
    }
}

/// Applies one response's evidence: the direct update and its propagation
/// run under a single session lock.
pub struct BeliefUpdater<'a> {
    pub store: &'a BeliefStore,
    pub correlations: &'a CorrelationIndex,
}

impl BeliefUpdater<'_> {
    pub fn apply_response(&self, session: Uuid, skill: &str, evidence: f64, response: Uuid) {
        let rows = self.store.session_rows(session);
        let mut rows = rows.lock().unwrap();
        record_evidence_locked(&mut rows, skill, evidence, response);
        propagate_locked(&mut rows, skill, evidence, self.correlations);
    }
}
