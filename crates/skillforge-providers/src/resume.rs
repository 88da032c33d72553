//! Resume-derived verified-skill extraction.
//!
//! Turns previously extracted resume data into the verified-skill set the
//! engine seeds belief priors from. The extracted-skills payload is a JSON
//! array of strings; a quoted-token scan covers malformed payloads, and a
//! common-skill scan over the raw text catches what extraction missed.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use regex::Regex;
use uuid::Uuid;

use skillforge_core::model::AssessmentSession;
use skillforge_core::traits::ResumeSkillProvider;

/// Well-known skills worth scanning raw resume text for.
const COMMON_SKILLS: [&str; 10] = [
    "java",
    "python",
    "javascript",
    "react",
    "spring",
    "sql",
    "git",
    "docker",
    "aws",
    "kubernetes",
];

/// Raw resume material for one session.
#[derive(Debug, Clone, Default)]
pub struct ResumeSource {
    /// JSON array of extracted skill names.
    pub extracted_skills_json: Option<String>,
    /// Full resume text.
    pub raw_text: Option<String>,
}

/// Extract the verified-skill set from resume material. Never errors;
/// malformed payloads degrade to whatever the fallbacks recover.
pub fn extract_verified_skills(source: &ResumeSource) -> HashSet<String> {
    let mut skills = HashSet::new();

    if let Some(json) = &source.extracted_skills_json {
        match serde_json::from_str::<Vec<String>>(json) {
            Ok(list) => {
                for skill in list {
                    let skill = skill.trim().to_lowercase();
                    if !skill.is_empty() {
                        skills.insert(skill);
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, "failed to parse extracted skills JSON, scanning quoted tokens");
                let quoted = Regex::new("\"(.*?)\"").expect("hardcoded pattern");
                for capture in quoted.captures_iter(json) {
                    let skill = capture[1].trim().to_lowercase();
                    if !skill.is_empty() {
                        skills.insert(skill);
                    }
                }
            }
        }
    }

    if let Some(raw) = &source.raw_text {
        let lower = raw.to_lowercase();
        for skill in COMMON_SKILLS {
            if lower.contains(skill) {
                skills.insert(skill.to_string());
            }
        }
    }

    skills
}

/// Per-session resume skills held in memory.
#[derive(Default)]
pub struct StaticResumeSkills {
    by_session: Mutex<HashMap<Uuid, HashSet<String>>>,
}

impl StaticResumeSkills {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register extracted resume material for a session.
    pub fn insert(&self, session_id: Uuid, source: &ResumeSource) {
        let skills = extract_verified_skills(source);
        self.by_session.lock().unwrap().insert(session_id, skills);
    }

    /// Register an already-extracted skill set.
    pub fn insert_skills(&self, session_id: Uuid, skills: HashSet<String>) {
        self.by_session.lock().unwrap().insert(session_id, skills);
    }
}

impl ResumeSkillProvider for StaticResumeSkills {
    fn verified_skills(&self, session: &AssessmentSession) -> Option<HashSet<String>> {
        self.by_session.lock().unwrap().get(&session.id).cloned()
    }
}
