//! The `skillforge simulate` command.
//!
//! Runs a full assessment loop against a catalog with a seeded synthetic
//! respondent: select → answer → record → stop-check, then prints the
//! stopping status and the final belief snapshot.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::Table;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skillforge_core::engine::{AssessmentEngine, EngineConfig};
use skillforge_core::memory::{
    InMemoryQuestionCatalog, InMemoryResponseStore, InMemorySessionStore, InMemorySkillCatalog,
};
use skillforge_core::model::{AssessmentSession, Question, QuestionKind, Response, SessionStatus};
use skillforge_core::parser;
use skillforge_core::traits::SessionStore;
use skillforge_providers::lexical::LexicalScorer;
use skillforge_providers::resume::StaticResumeSkills;

pub async fn execute(
    catalog_path: PathBuf,
    target_role: Option<String>,
    proficiency: f64,
    seed: u64,
    resume_skills: Option<String>,
) -> Result<()> {
    let catalog = parser::parse_catalog(&catalog_path)?;
    for w in parser::validate_catalog(&catalog) {
        tracing::warn!("catalog: {}", w.message);
    }

    let engine = AssessmentEngine::new(
        Arc::new(InMemorySkillCatalog::new(
            catalog.skills.clone(),
            catalog.dependencies.clone(),
        )),
        Arc::new(InMemoryQuestionCatalog::new(catalog.questions.clone())),
        Arc::new(InMemoryResponseStore::new()),
        EngineConfig::default(),
    )
    .with_semantic_scorer(Arc::new(LexicalScorer));

    let mut session = AssessmentSession::new(format!("sim-{seed}"));
    if let Some(role) = target_role {
        session = session.with_target_role(role);
    }
    let sessions = InMemorySessionStore::new();
    sessions.insert(session.clone());

    let engine = match resume_skills {
        Some(skills) => {
            let provider = StaticResumeSkills::new();
            let verified: HashSet<String> = skills
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            provider.insert_skills(session.id, verified);
            engine.with_resume_provider(Arc::new(provider))
        }
        None => engine,
    };

    let mut respondent = SimulatedRespondent::new(seed, proficiency);
    let mut asked = 0usize;

    loop {
        if engine.should_stop(&session) {
            break;
        }
        let Some(question) = engine.select_next_question(&session) else {
            println!("Question pool exhausted after {asked} question(s).");
            break;
        };

        let answer = respondent.answer(&question);
        println!("Q{:>2} [{}] {}", asked + 1, question.skill, question.text);

        let mut response = Response::new(session.id, question.id, answer);
        response.total_time_seconds = Some(respondent.seconds_taken());
        engine.record_response(response).await?;
        asked += 1;
    }

    let mut completed = sessions.find_by_id(session.id).unwrap_or_else(|| session.clone());
    completed.status = SessionStatus::Completed;
    completed.completed_at = Some(chrono::Utc::now());
    sessions.update(completed);

    let status = engine.stopping_status(&session);
    println!();
    match engine.stop_reason(&session) {
        Some(reason) => println!("Stopped after {asked} question(s): {reason:?}"),
        None => println!("Assessment ended after {asked} question(s)."),
    }
    println!(
        "Coverage {:.0}%, confidence {:.0}%, elapsed {}s",
        status.coverage_ratio * 100.0,
        status.confidence_ratio * 100.0,
        status.elapsed_seconds
    );

    let beliefs = engine.get_beliefs(&session);
    let mut rows: Vec<(String, f64)> = beliefs.into_iter().collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut table = Table::new();
    table.set_header(vec!["Skill", "Belief"]);
    for (code, belief) in rows {
        table.add_row(vec![code, format!("{belief:.3}")]);
    }
    println!("{table}");

    Ok(())
}

/// Answers questions with a quality governed by `proficiency`.
struct SimulatedRespondent {
    rng: StdRng,
    proficiency: f64,
}

impl SimulatedRespondent {
    fn new(seed: u64, proficiency: f64) -> Self {
        SimulatedRespondent {
            rng: StdRng::seed_from_u64(seed),
            proficiency: proficiency.clamp(0.0, 1.0),
        }
    }

    fn answer(&mut self, question: &Question) -> String {
        match &question.kind {
            QuestionKind::Mcq {
                options,
                correct_answer,
            } => {
                if self.rng.gen_bool(self.proficiency) {
                    correct_answer.clone()
                } else {
                    options
                        .iter()
                        .find(|o| *o != correct_answer)
                        .cloned()
                        .unwrap_or_else(|| correct_answer.clone())
                }
            }
            QuestionKind::Text { context_hint } => {
                let hint = context_hint.as_deref().unwrap_or(&question.text);
                if self.rng.gen_bool(self.proficiency) {
                    format!(
                        "In my experience this comes down to {hint}. For example, I \
                         implemented this approach in production and led the team \
                         through the rollout process over several months."
                    )
                } else {
                    "I am not sure, I am still learning this.".to_string()
                }
            }
        }
    }

    fn seconds_taken(&mut self) -> u32 {
        self.rng.gen_range(20..120)
    }
}
