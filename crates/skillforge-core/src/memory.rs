//! In-memory collaborator implementations.
//!
//! Used by unit tests, the CLI simulate harness, and any host embedding the
//! engine without persistent storage.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::model::{AssessmentSession, Question, Response, Skill, SkillDependency};
use crate::traits::{QuestionCatalog, ResponseStore, SessionStore, SkillCatalog};

/// Fixed skill catalog.
pub struct InMemorySkillCatalog {
    skills: Vec<Skill>,
    dependencies: Vec<SkillDependency>,
}

impl InMemorySkillCatalog {
    pub fn new(skills: Vec<Skill>, dependencies: Vec<SkillDependency>) -> Self {
        Self {
            skills,
            dependencies,
        }
    }
}

impl SkillCatalog for InMemorySkillCatalog {
    fn list_all(&self) -> Vec<Skill> {
        self.skills.clone()
    }

    fn find_by_code(&self, code: &str) -> Option<Skill> {
        self.skills.iter().find(|s| s.code == code).cloned()
    }

    fn list_dependencies(&self) -> Vec<SkillDependency> {
        self.dependencies.clone()
    }
}

/// Fixed question catalog.
pub struct InMemoryQuestionCatalog {
    questions: Vec<Question>,
}

impl InMemoryQuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

impl QuestionCatalog for InMemoryQuestionCatalog {
    fn list_all(&self) -> Vec<Question> {
        self.questions.clone()
    }

    fn find_by_skill(&self, skill_code: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.skill == skill_code)
            .cloned()
            .collect()
    }

    fn find_by_id(&self, id: u64) -> Option<Question> {
        self.questions.iter().find(|q| q.id == id).cloned()
    }
}

/// Append-only response log with in-place updates by response id.
#[derive(Default)]
pub struct InMemoryResponseStore {
    responses: Mutex<Vec<Response>>,
}

impl InMemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored response, for assertions.
    pub fn all(&self) -> Vec<Response> {
        self.responses.lock().unwrap().clone()
    }
}

impl ResponseStore for InMemoryResponseStore {
    fn find_by_session(&self, session_id: Uuid) -> Vec<Response> {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect()
    }

    fn answered_question_ids(&self, session_id: Uuid) -> Vec<u64> {
        let mut seen = Vec::new();
        for response in self.responses.lock().unwrap().iter() {
            if response.session_id == session_id && !seen.contains(&response.question_id) {
                seen.push(response.question_id);
            }
        }
        seen
    }

    fn append(&self, response: Response) {
        self.responses.lock().unwrap().push(response);
    }

    fn update(&self, response: Response) {
        let mut responses = self.responses.lock().unwrap();
        match responses.iter_mut().find(|r| r.id == response.id) {
            Some(stored) => *stored = response,
            None => {
                tracing::warn!(response = %response.id, "update for unknown response, appending");
                responses.push(response);
            }
        }
    }
}

/// Session map keyed by id.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<Uuid, AssessmentSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: AssessmentSession) {
        self.sessions.lock().unwrap().insert(session.id, session);
    }
}

impl SessionStore for InMemorySessionStore {
    fn find_by_id(&self, id: Uuid) -> Option<AssessmentSession> {
        self.sessions.lock().unwrap().get(&id).cloned()
    }

    fn update(&self, session: AssessmentSession) {
        self.sessions.lock().unwrap().insert(session.id, session);
    }
}
