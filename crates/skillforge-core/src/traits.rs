//! Collaborator trait definitions.
//!
//! The engine consumes catalogs, stores, and optional scoring providers
//! through these seams. Persistent implementations live in the host
//! application; `skillforge-providers` supplies the outward-facing ones and
//! [`crate::memory`] supplies in-memory ones for tests and embedding hosts.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{AssessmentSession, Question, Response, Skill, SkillDependency};

// ---------------------------------------------------------------------------
// Catalog providers
// ---------------------------------------------------------------------------

/// Read access to the skill catalog and its dependency declarations.
pub trait SkillCatalog: Send + Sync {
    fn list_all(&self) -> Vec<Skill>;
    fn find_by_code(&self, code: &str) -> Option<Skill>;
    fn list_dependencies(&self) -> Vec<SkillDependency>;
}

/// Read access to the question catalog.
pub trait QuestionCatalog: Send + Sync {
    fn list_all(&self) -> Vec<Question>;
    fn find_by_skill(&self, skill_code: &str) -> Vec<Question>;
    fn find_by_id(&self, id: u64) -> Option<Question>;
}

// ---------------------------------------------------------------------------
// Session state stores
// ---------------------------------------------------------------------------

/// Storage for answered responses.
pub trait ResponseStore: Send + Sync {
    /// All responses for a session in answer order.
    fn find_by_session(&self, session_id: Uuid) -> Vec<Response>;
    /// Question ids already answered in a session, in answer order.
    fn answered_question_ids(&self, session_id: Uuid) -> Vec<u64>;
    fn append(&self, response: Response);
    /// Replace a stored response (e.g. with a late similarity score).
    fn update(&self, response: Response);
}

/// Storage for assessment sessions.
pub trait SessionStore: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> Option<AssessmentSession>;
    fn update(&self, session: AssessmentSession);
}

// ---------------------------------------------------------------------------
// Optional scoring collaborators
// ---------------------------------------------------------------------------

/// Semantic similarity between an expected and an actual answer.
///
/// `Ok(None)` means the provider is unavailable for this input; the engine
/// then keeps the deterministic local score. Errors are logged and treated
/// the same way, never propagated to the caller.
#[async_trait]
pub trait SemanticScorer: Send + Sync {
    /// Human-readable provider name (e.g. "embedding").
    fn name(&self) -> &str;

    /// Similarity in [0, 1], or `None` when unavailable.
    async fn similarity(&self, expected: &str, actual: &str) -> anyhow::Result<Option<f64>>;
}

/// Resume-derived verified skills, used to seed belief priors.
pub trait ResumeSkillProvider: Send + Sync {
    /// `None` when the session has no resume data.
    fn verified_skills(&self, session: &AssessmentSession) -> Option<HashSet<String>>;
}
