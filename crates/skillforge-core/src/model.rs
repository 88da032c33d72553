//! Core data model types for skillforge.
//!
//! These are the fundamental types the entire skillforge system uses to
//! represent skills, their dependencies, questions, responses, and
//! assessment sessions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A skill in the assessment catalog. Immutable reference data within a
/// session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Unique skill code (e.g. "rust-ownership").
    pub code: String,
    /// Human-readable name.
    pub display_name: String,
    /// Broad domain the skill belongs to.
    pub category: SkillCategory,
    /// Relative importance weight (>= 0).
    #[serde(default = "default_importance")]
    pub importance_weight: f64,
    /// Description of the skill.
    #[serde(default)]
    pub description: String,
}

fn default_importance() -> f64 {
    1.0
}

/// Broad skill domains, used for role filtering and evidence correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Programming,
    Systems,
    Data,
    Cloud,
    SoftSkills,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Programming => "programming",
            SkillCategory::Systems => "systems",
            SkillCategory::Data => "data",
            SkillCategory::Cloud => "cloud",
            SkillCategory::SoftSkills => "soft_skills",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "programming" => Ok(SkillCategory::Programming),
            "systems" => Ok(SkillCategory::Systems),
            "data" => Ok(SkillCategory::Data),
            "cloud" => Ok(SkillCategory::Cloud),
            "soft_skills" | "soft-skills" | "softskills" => Ok(SkillCategory::SoftSkills),
            other => Err(format!("unknown skill category: {other}")),
        }
    }
}

/// A directed dependency between two skills: one edge from `parent` to
/// `child`. The catalog is expected to be acyclic, but this is not enforced
/// at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDependency {
    pub parent: String,
    pub child: String,
    /// Edge strength in [0, 1].
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub kind: DependencyKind,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Prerequisite,
    Complementary,
    Advanced,
}

impl FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prerequisite" => Ok(DependencyKind::Prerequisite),
            "complementary" => Ok(DependencyKind::Complementary),
            "advanced" => Ok(DependencyKind::Advanced),
            other => Err(format!("unknown dependency kind: {other}")),
        }
    }
}

/// Question difficulty bands and their scalar positions on the [0, 1] axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Scalar used by the difficulty-fit heuristic.
    pub fn scalar(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.25,
            Difficulty::Intermediate => 0.5,
            Difficulty::Advanced => 0.75,
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A question in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable catalog identifier.
    pub id: u64,
    /// Code of the skill this question probes.
    pub skill: String,
    /// The question text shown to the candidate.
    pub text: String,
    /// Explicit topic used by the type-diversity heuristic. Falls back to
    /// the skill code when absent.
    #[serde(default)]
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    /// Optional explicit scalar difficulty overriding the band mapping.
    #[serde(default)]
    pub difficulty_override: Option<f64>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Type-specific question payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq {
        options: Vec<String>,
        correct_answer: String,
    },
    Text {
        #[serde(default)]
        context_hint: Option<String>,
    },
}

impl QuestionKind {
    pub fn is_mcq(&self) -> bool {
        matches!(self, QuestionKind::Mcq { .. })
    }
}

impl Question {
    /// Difficulty as a scalar in [0, 1].
    pub fn difficulty_scalar(&self) -> f64 {
        self.difficulty_override
            .map(|d| d.clamp(0.0, 1.0))
            .unwrap_or_else(|| self.difficulty.scalar())
    }

    /// Key used by the type-diversity heuristic.
    pub fn diversity_key(&self) -> &str {
        self.topic.as_deref().unwrap_or(&self.skill)
    }
}

/// One answered question, plus the metrics derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: u64,
    /// The raw answer as submitted.
    pub answer_text: String,
    /// Mcq correctness; filled by the engine when absent.
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub char_count: Option<u32>,
    #[serde(default)]
    pub keyword_matches: Vec<String>,
    #[serde(default)]
    pub specificity_score: Option<f64>,
    #[serde(default)]
    pub depth_score: Option<f64>,
    /// Cosine similarity to the expected answer, recorded off the critical
    /// path when a semantic scorer is configured.
    #[serde(default)]
    pub similarity_score: Option<f64>,
    #[serde(default)]
    pub think_time_seconds: Option<u32>,
    #[serde(default)]
    pub total_time_seconds: Option<u32>,
    pub answered_at: DateTime<Utc>,
}

impl Response {
    pub fn new(session_id: Uuid, question_id: u64, answer_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            question_id,
            answer_text: answer_text.into(),
            is_correct: None,
            word_count: None,
            char_count: None,
            keyword_matches: Vec::new(),
            specificity_score: None,
            depth_score: None,
            similarity_score: None,
            think_time_seconds: None,
            total_time_seconds: None,
            answered_at: Utc::now(),
        }
    }
}

/// One candidate's assessment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub id: Uuid,
    pub token: String,
    /// Role the candidate is being assessed for, if any. Drives the
    /// question-pool filter and the coverage stopping rule.
    #[serde(default)]
    pub target_role: Option<String>,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl AssessmentSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: token.into(),
            target_role: None,
            status: SessionStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn with_target_role(mut self, role: impl Into<String>) -> Self {
        self.target_role = Some(role.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_and_parse() {
        assert_eq!(SkillCategory::Programming.to_string(), "programming");
        assert_eq!(
            "soft-skills".parse::<SkillCategory>().unwrap(),
            SkillCategory::SoftSkills
        );
        assert!("juggling".parse::<SkillCategory>().is_err());
    }

    #[test]
    fn difficulty_scalar_mapping() {
        assert_eq!(Difficulty::Easy.scalar(), 0.25);
        assert_eq!(Difficulty::Intermediate.scalar(), 0.5);
        assert_eq!(Difficulty::Advanced.scalar(), 0.75);
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Intermediate);
    }

    #[test]
    fn difficulty_override_wins_and_clamps() {
        let q = Question {
            id: 1,
            skill: "rust".into(),
            text: "Explain ownership".into(),
            topic: None,
            difficulty: Difficulty::Easy,
            difficulty_override: Some(1.7),
            kind: QuestionKind::Text { context_hint: None },
        };
        assert_eq!(q.difficulty_scalar(), 1.0);
    }

    #[test]
    fn diversity_key_falls_back_to_skill() {
        let mut q = Question {
            id: 1,
            skill: "sql".into(),
            text: "What is a join?".into(),
            topic: Some("databases".into()),
            difficulty: Difficulty::Easy,
            difficulty_override: None,
            kind: QuestionKind::Text { context_hint: None },
        };
        assert_eq!(q.diversity_key(), "databases");
        q.topic = None;
        assert_eq!(q.diversity_key(), "sql");
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question {
            id: 7,
            skill: "rust".into(),
            text: "Which keyword declares an immutable binding?".into(),
            topic: Some("language-basics".into()),
            difficulty: Difficulty::Easy,
            difficulty_override: None,
            kind: QuestionKind::Mcq {
                options: vec!["let".into(), "var".into(), "const fn".into()],
                correct_answer: "let".into(),
            },
        };
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, 7);
        assert!(back.kind.is_mcq());
    }
}
