//! Central assessment engine.
//!
//! Wires the catalogs, stores, and optional scoring collaborators together:
//! a completed response flows through text analysis, evidence scoring, the
//! serialized belief update with propagation, and an off-critical-path
//! similarity pass; selection and stopping read the resulting state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::TextAnalyzer;
use crate::beliefs::{BeliefStore, BeliefUpdater, Priors, SkillBelief, NEUTRAL_BELIEF};
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::graph::{CorrelationIndex, SkillGraph};
use crate::model::{AssessmentSession, Question, QuestionKind, Response, Skill};
use crate::scoring::ResponseScorer;
use crate::selector::{role_filtered, QuestionSelector, SelectionContext, SelectorConfig};
use crate::stopping::{StopReason, StoppingInput, StoppingPolicy, StoppingStatus};
use crate::traits::{
    QuestionCatalog, ResponseStore, ResumeSkillProvider, SemanticScorer, SkillCatalog,
};

/// Default question-catalog cache TTL.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(5 * 60);

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub catalog_ttl: Duration,
    pub selector: SelectorConfig,
    pub stopping: StoppingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            catalog_ttl: DEFAULT_CATALOG_TTL,
            selector: SelectorConfig::default(),
            stopping: StoppingPolicy::default(),
        }
    }
}

/// Graph-derived state, rebuilt as a unit when the skill catalog changes.
struct GraphState {
    graph: SkillGraph,
    correlations: CorrelationIndex,
    skills: Vec<Skill>,
    skills_by_code: HashMap<String, Skill>,
}

/// Session progress summary for the host application.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentProgress {
    pub answered: usize,
    pub total: usize,
    pub beliefs: HashMap<String, f64>,
    pub should_continue: bool,
    /// Mean belief across the catalog.
    pub overall_progress: f64,
}

/// The central assessment engine.
pub struct AssessmentEngine {
    skills: Arc<dyn SkillCatalog>,
    questions: Arc<dyn QuestionCatalog>,
    responses: Arc<dyn ResponseStore>,
    semantic: Option<Arc<dyn SemanticScorer>>,
    resume: Option<Arc<dyn ResumeSkillProvider>>,
    graph: RwLock<Arc<GraphState>>,
    question_cache: TtlCache<Vec<Question>>,
    beliefs: BeliefStore,
    selector: QuestionSelector,
    config: EngineConfig,
    analyzer: TextAnalyzer,
}

impl AssessmentEngine {
    /// Build the engine, constructing the skill graph and its correlation
    /// index up front.
    pub fn new(
        skills: Arc<dyn SkillCatalog>,
        questions: Arc<dyn QuestionCatalog>,
        responses: Arc<dyn ResponseStore>,
        config: EngineConfig,
    ) -> Self {
        Self::with_clock(skills, questions, responses, config, Arc::new(SystemClock))
    }

    /// Like [`AssessmentEngine::new`] with an injected clock for the
    /// question-catalog cache.
    pub fn with_clock(
        skills: Arc<dyn SkillCatalog>,
        questions: Arc<dyn QuestionCatalog>,
        responses: Arc<dyn ResponseStore>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = Self::build_state(skills.as_ref());
        AssessmentEngine {
            skills,
            questions,
            responses,
            semantic: None,
            resume: None,
            graph: RwLock::new(Arc::new(state)),
            question_cache: TtlCache::new(config.catalog_ttl, clock),
            beliefs: BeliefStore::new(),
            selector: QuestionSelector::new(config.selector.clone()),
            config,
            analyzer: TextAnalyzer::new(),
        }
    }

    pub fn with_semantic_scorer(mut self, scorer: Arc<dyn SemanticScorer>) -> Self {
        self.semantic = Some(scorer);
        self
    }

    pub fn with_resume_provider(mut self, provider: Arc<dyn ResumeSkillProvider>) -> Self {
        self.resume = Some(provider);
        self
    }

    fn build_state(skills: &dyn SkillCatalog) -> GraphState {
        let skill_list = skills.list_all();
        let dependencies = skills.list_dependencies();
        let graph = SkillGraph::build(&skill_list, &dependencies);
        let correlations = CorrelationIndex::build(&graph, &skill_list);
        let skills_by_code = skill_list
            .iter()
            .map(|s| (s.code.clone(), s.clone()))
            .collect();
        GraphState {
            graph,
            correlations,
            skills: skill_list,
            skills_by_code,
        }
    }

    fn graph_state(&self) -> Arc<GraphState> {
        Arc::clone(&self.graph.read().unwrap())
    }

    fn cached_questions(&self) -> Arc<Vec<Question>> {
        self.question_cache.get_with(|| self.questions.list_all())
    }

    /// Rebuild the skill graph and correlation index from the catalog.
    /// Call after the skill/dependency catalog changes.
    pub fn rebuild_graph(&self) {
        let state = Self::build_state(self.skills.as_ref());
        *self.graph.write().unwrap() = Arc::new(state);
        tracing::info!("skill graph rebuilt");
    }

    /// Drop the cached question catalog. Call after question mutation.
    pub fn refresh_catalog(&self) {
        self.question_cache.invalidate();
        tracing::debug!("question catalog cache invalidated");
    }

    /// True when the underlying skill graph has a cycle; topological-order
    /// dependent operations fail closed in that case.
    pub fn graph_has_cycles(&self) -> bool {
        self.graph_state().graph.has_cycles()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Pick the next question for a session, or `None` when every
    /// candidate has been answered.
    pub fn select_next_question(&self, session: &AssessmentSession) -> Option<Question> {
        let state = self.graph_state();
        let questions = self.cached_questions();
        let answered: HashSet<u64> = self
            .responses
            .answered_question_ids(session.id)
            .into_iter()
            .collect();
        let recent = self.recent_topics(session.id, &questions);

        let ctx = SelectionContext {
            session_id: session.id,
            target_role: session.target_role.as_deref(),
            questions: &questions,
            skills: &state.skills_by_code,
            answered: &answered,
            recent_topics: &recent,
            graph: &state.graph,
            beliefs: &self.beliefs,
        };
        self.selector.select(&ctx).cloned()
    }

    /// The `count` best-scoring unanswered questions for a session.
    pub fn recommended_questions(
        &self,
        session: &AssessmentSession,
        count: usize,
    ) -> Vec<Question> {
        let state = self.graph_state();
        let questions = self.cached_questions();
        let answered: HashSet<u64> = self
            .responses
            .answered_question_ids(session.id)
            .into_iter()
            .collect();
        let recent = self.recent_topics(session.id, &questions);

        let ctx = SelectionContext {
            session_id: session.id,
            target_role: session.target_role.as_deref(),
            questions: &questions,
            skills: &state.skills_by_code,
            answered: &answered,
            recent_topics: &recent,
            graph: &state.graph,
            beliefs: &self.beliefs,
        };
        self.selector
            .top_n(&ctx, count)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Diversity keys of the most recently answered questions, oldest
    /// first.
    fn recent_topics(&self, session_id: Uuid, questions: &[Question]) -> Vec<String> {
        let responses = self.responses.find_by_session(session_id);
        let window = self.config.selector.recent_window;
        let start = responses.len().saturating_sub(window);
        responses[start..]
            .iter()
            .filter_map(|r| {
                questions
                    .iter()
                    .find(|q| q.id == r.question_id)
                    .map(|q| q.diversity_key().to_string())
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Evidence
    // -----------------------------------------------------------------------

    /// Record a completed response: derive missing metrics, score it,
    /// apply the belief update with propagation, and kick off the deferred
    /// similarity pass. A dangling question reference degrades to a stored
    /// but unscored response.
    pub async fn record_response(&self, response: Response) -> Result<()> {
        let Some(question) = self.questions.find_by_id(response.question_id) else {
            tracing::warn!(
                question = response.question_id,
                "response references unknown question, storing without belief update"
            );
            self.responses.append(response);
            return Ok(());
        };

        let mut response = response;
        match &question.kind {
            QuestionKind::Mcq { correct_answer, .. } => {
                if response.is_correct.is_none() {
                    response.is_correct =
                        Some(ResponseScorer::grade_mcq(correct_answer, &response.answer_text));
                }
            }
            QuestionKind::Text { .. } => {
                if response.specificity_score.is_none() || response.depth_score.is_none() {
                    let metrics = self.analyzer.analyze(&response.answer_text);
                    response.word_count.get_or_insert(metrics.word_count);
                    response.char_count.get_or_insert(metrics.char_count);
                    response.specificity_score.get_or_insert(metrics.specificity);
                    response.depth_score.get_or_insert(metrics.depth);
                    if response.keyword_matches.is_empty() {
                        response.keyword_matches = metrics.keywords;
                    }
                }
            }
        }

        let evidence = ResponseScorer::evidence(&question, &response);
        tracing::debug!(
            response = %response.id,
            skill = %question.skill,
            evidence,
            "recording evidence"
        );

        self.responses.append(response.clone());

        let state = self.graph_state();
        BeliefUpdater {
            store: &self.beliefs,
            correlations: &state.correlations,
        }
        .apply_response(response.session_id, &question.skill, evidence, response.id);

        if let QuestionKind::Text { context_hint } = &question.kind {
            if let Some(scorer) = &self.semantic {
                self.spawn_similarity_pass(&question, context_hint.clone(), response, scorer);
            }
        }

        Ok(())
    }

    /// Compute the semantic similarity off the critical path and persist
    /// it onto the stored response. Belief state is eventually consistent
    /// within this lag; failures keep the deterministic local score.
    fn spawn_similarity_pass(
        &self,
        question: &Question,
        context_hint: Option<String>,
        mut response: Response,
        scorer: &Arc<dyn SemanticScorer>,
    ) {
        let expected = context_hint
            .filter(|hint| !hint.trim().is_empty())
            .unwrap_or_else(|| question.text.clone());
        let scorer = Arc::clone(scorer);
        let responses = Arc::clone(&self.responses);

        tokio::spawn(async move {
            match scorer.similarity(&expected, &response.answer_text).await {
                Ok(Some(similarity)) => {
                    response.similarity_score = Some(similarity.clamp(0.0, 1.0));
                    responses.update(response);
                }
                Ok(None) => {
                    tracing::debug!(
                        scorer = scorer.name(),
                        "semantic scorer unavailable, keeping local score"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        scorer = scorer.name(),
                        %error,
                        "semantic scoring failed, keeping local score"
                    );
                }
            }
        });
    }

    // -----------------------------------------------------------------------
    // Beliefs
    // -----------------------------------------------------------------------

    /// All-skills belief snapshot, blending resume-derived priors.
    pub fn get_beliefs(&self, session: &AssessmentSession) -> HashMap<String, f64> {
        let state = self.graph_state();
        let priors = self.priors_for(session);
        self.beliefs.snapshot(session.id, &state.skills, &priors)
    }

    /// Single-skill belief: the stored value, or flat 0.5 when no direct
    /// evidence exists. Unlike [`AssessmentEngine::get_beliefs`] this never
    /// consults the resume prior.
    pub fn get_belief(&self, session_id: Uuid, skill_code: &str) -> f64 {
        self.beliefs.belief_of(session_id, skill_code)
    }

    /// Stored belief row for one skill, if direct evidence created one.
    pub fn belief_row(&self, session_id: Uuid, skill_code: &str) -> Option<SkillBelief> {
        self.beliefs.row(session_id, skill_code)
    }

    /// Drop belief state owned by a session.
    pub fn end_session(&self, session_id: Uuid) {
        self.beliefs.remove_session(session_id);
    }

    fn priors_for(&self, session: &AssessmentSession) -> Priors {
        match &self.resume {
            Some(provider) => match provider.verified_skills(session) {
                Some(verified) => Priors::from_verified(verified),
                None => Priors::none(),
            },
            None => Priors::none(),
        }
    }

    // -----------------------------------------------------------------------
    // Stopping & progress
    // -----------------------------------------------------------------------

    fn stopping_input(&self, session: &AssessmentSession) -> StoppingInput {
        let responses = self.responses.find_by_session(session.id);
        let elapsed_seconds: u64 = responses
            .iter()
            .filter_map(|r| r.total_time_seconds)
            .map(u64::from)
            .sum();
        StoppingInput {
            answered_count: responses.len(),
            elapsed_seconds,
            beliefs: self.get_beliefs(session),
            has_target_role: session.target_role.is_some(),
        }
    }

    pub fn should_stop(&self, session: &AssessmentSession) -> bool {
        self.config
            .stopping
            .evaluate(&self.stopping_input(session))
            .should_stop()
    }

    pub fn stop_reason(&self, session: &AssessmentSession) -> Option<StopReason> {
        self.config
            .stopping
            .evaluate(&self.stopping_input(session))
            .reason()
    }

    pub fn stopping_status(&self, session: &AssessmentSession) -> StoppingStatus {
        self.config.stopping.status(&self.stopping_input(session))
    }

    pub fn get_progress(&self, session: &AssessmentSession) -> AssessmentProgress {
        let state = self.graph_state();
        let questions = self.cached_questions();
        let answered = self.responses.find_by_session(session.id).len();
        let beliefs = self.get_beliefs(session);

        let total = match session.target_role.as_deref() {
            Some(role) => {
                let filtered =
                    role_filtered(&questions, &state.skills_by_code, &role.to_lowercase());
                if filtered.is_empty() {
                    questions.len()
                } else {
                    filtered.len()
                }
            }
            None => questions.len(),
        };

        let overall_progress = if beliefs.is_empty() {
            NEUTRAL_BELIEF
        } else {
            beliefs.values().sum::<f64>() / beliefs.len() as f64
        };

        AssessmentProgress {
            answered,
            total,
            should_continue: !self.should_stop(session),
            overall_progress,
            beliefs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryQuestionCatalog, InMemoryResponseStore, InMemorySkillCatalog};
    use crate::model::{DependencyKind, Difficulty, SessionStatus, SkillCategory, SkillDependency};
    use async_trait::async_trait;

    fn skill(code: &str, category: SkillCategory) -> Skill {
        Skill {
            code: code.into(),
            display_name: code.to_uppercase(),
            category,
            importance_weight: 1.0,
            description: String::new(),
        }
    }

    fn mcq(id: u64, skill: &str) -> Question {
        Question {
            id,
            skill: skill.into(),
            text: format!("question {id}"),
            topic: None,
            difficulty: Difficulty::Intermediate,
            difficulty_override: None,
            kind: QuestionKind::Mcq {
                options: vec!["let".into(), "var".into()],
                correct_answer: "let".into(),
            },
        }
    }

    fn text_question(id: u64, skill: &str) -> Question {
        Question {
            id,
            skill: skill.into(),
            text: format!("explain {skill}"),
            topic: None,
            difficulty: Difficulty::Intermediate,
            difficulty_override: None,
            kind: QuestionKind::Text {
                context_hint: Some("ownership, borrowing".into()),
            },
        }
    }

    struct Harness {
        engine: AssessmentEngine,
        responses: Arc<InMemoryResponseStore>,
    }

    fn harness() -> Harness {
        harness_with(|engine| engine)
    }

    fn harness_with(adapt: impl FnOnce(AssessmentEngine) -> AssessmentEngine) -> Harness {
        let skills = vec![
            skill("basics", SkillCategory::Programming),
            skill("rust", SkillCategory::Programming),
            skill("sql", SkillCategory::Data),
        ];
        let deps = vec![SkillDependency {
            parent: "basics".into(),
            child: "rust".into(),
            weight: 1.0,
            kind: DependencyKind::Prerequisite,
        }];
        let mut questions: Vec<Question> = (1..=16).map(|id| mcq(id, "rust")).collect();
        questions.push(text_question(20, "rust"));
        questions.push(mcq(30, "basics"));
        questions.push(mcq(31, "sql"));

        let responses = Arc::new(InMemoryResponseStore::new());
        let engine = AssessmentEngine::new(
            Arc::new(InMemorySkillCatalog::new(skills, deps)),
            Arc::new(InMemoryQuestionCatalog::new(questions)),
            responses.clone(),
            EngineConfig::default(),
        );
        Harness {
            engine: adapt(engine),
            responses,
        }
    }

    fn session() -> AssessmentSession {
        AssessmentSession::new("token")
    }

    struct StaticResume(HashSet<String>);

    impl ResumeSkillProvider for StaticResume {
        fn verified_skills(&self, _session: &AssessmentSession) -> Option<HashSet<String>> {
            Some(self.0.clone())
        }
    }

    struct FixedSimilarity(f64);

    #[async_trait]
    impl SemanticScorer for FixedSimilarity {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn similarity(&self, _expected: &str, _actual: &str) -> Result<Option<f64>> {
            Ok(Some(self.0))
        }
    }

    #[tokio::test]
    async fn beliefs_default_to_neutral_priors() {
        let h = harness();
        let s = session();
        let beliefs = h.engine.get_beliefs(&s);
        assert_eq!(beliefs.len(), 3);
        assert!(beliefs.values().all(|b| *b == 0.5));
    }

    #[tokio::test]
    async fn resume_priors_seed_the_snapshot() {
        let h = harness_with(|e| {
            e.with_resume_provider(Arc::new(StaticResume(HashSet::from(["rust".to_string()]))))
        });
        let s = session();
        let beliefs = h.engine.get_beliefs(&s);
        assert_eq!(beliefs["rust"], 0.8);
        assert_eq!(beliefs["basics"], 0.2);
        assert_eq!(beliefs["sql"], 0.2);
        // The single-skill path stays flat regardless of resume data.
        assert_eq!(h.engine.get_belief(s.id, "rust"), 0.5);
    }

    #[tokio::test]
    async fn correct_mcq_creates_full_belief_row() {
        let h = harness();
        let s = session();
        h.engine
            .record_response(Response::new(s.id, 1, "let"))
            .await
            .unwrap();

        let row = h.engine.belief_row(s.id, "rust").unwrap();
        assert_eq!(row.belief, 1.0);
        assert_eq!(row.confidence, 0.5);
        assert_eq!(row.evidence.len(), 1);
        assert_eq!(h.responses.all()[0].is_correct, Some(true));
    }

    #[tokio::test]
    async fn text_followup_blends_evidence() {
        let h = harness();
        let s = session();
        h.engine
            .record_response(Response::new(s.id, 1, "let"))
            .await
            .unwrap();

        let mut followup = Response::new(s.id, 20, "a discussion of ownership");
        followup.specificity_score = Some(0.6);
        followup.depth_score = Some(0.5);
        followup.char_count = Some(200);
        h.engine.record_response(followup).await.unwrap();

        let row = h.engine.belief_row(s.id, "rust").unwrap();
        assert!((row.belief - 0.745).abs() < 1e-9, "got {}", row.belief);
        assert!((row.confidence - 0.6).abs() < 1e-9);
        assert_eq!(row.evidence.len(), 2);
    }

    #[tokio::test]
    async fn text_metrics_are_derived_when_missing() {
        let h = harness();
        let s = session();
        h.engine
            .record_response(Response::new(
                s.id,
                20,
                "I built APIs with Rust and Docker. For example, our approach \
                 split the deployment process into stages that the team managed.",
            ))
            .await
            .unwrap();

        let stored = &h.responses.all()[0];
        assert!(stored.word_count.is_some());
        assert!(stored.specificity_score.unwrap() > 0.0);
        assert!(stored.depth_score.unwrap() > 0.0);
        assert!(!stored.keyword_matches.is_empty());
    }

    #[tokio::test]
    async fn propagation_never_creates_rows() {
        let h = harness();
        let s = session();
        h.engine
            .record_response(Response::new(s.id, 1, "let"))
            .await
            .unwrap();

        assert!(h.engine.belief_row(s.id, "basics").is_none());
        assert_eq!(h.engine.get_belief(s.id, "basics"), 0.5);
    }

    #[tokio::test]
    async fn propagation_reaches_existing_rows() {
        let h = harness();
        let s = session();
        // Direct evidence for basics first, then rust evidence propagates
        // back over the category correlation (0.4).
        h.engine
            .record_response(Response::new(s.id, 30, "let"))
            .await
            .unwrap();
        h.engine
            .record_response(Response::new(s.id, 1, "let"))
            .await
            .unwrap();

        let row = h.engine.belief_row(s.id, "basics").unwrap();
        // propagated = 1.0·0.4·0.5 = 0.2; belief' = (1.0·0.5 + 0.2·0.3)/0.8
        assert!((row.belief - 0.7).abs() < 1e-9, "got {}", row.belief);
        assert_eq!(row.confidence, 0.5);
    }

    #[tokio::test]
    async fn dangling_question_reference_is_neutralized() {
        let h = harness();
        let s = session();
        h.engine
            .record_response(Response::new(s.id, 999, "anything"))
            .await
            .unwrap();

        assert_eq!(h.responses.all().len(), 1);
        assert!(h.engine.get_beliefs(&s).values().all(|b| *b == 0.5));
    }

    #[tokio::test]
    async fn below_minimum_continues() {
        let h = harness();
        let s = session();
        for id in 1..=9 {
            let mut r = Response::new(s.id, id, "let");
            r.total_time_seconds = Some(133);
            h.engine.record_response(r).await.unwrap();
        }
        assert!(!h.engine.should_stop(&s));
        assert_eq!(h.engine.stop_reason(&s), None);
    }

    #[tokio::test]
    async fn max_questions_forces_stop() {
        let h = harness();
        let s = session();
        for id in 1..=15 {
            h.engine
                .record_response(Response::new(s.id, id, "let"))
                .await
                .unwrap();
        }
        assert!(h.engine.should_stop(&s));
        assert_eq!(h.engine.stop_reason(&s), Some(StopReason::MaxQuestionsReached));

        let status = h.engine.stopping_status(&s);
        assert!(status.should_stop);
        assert_eq!(status.answered_count, 15);
    }

    #[tokio::test]
    async fn selection_is_deterministic_after_warm_up() {
        let h = harness();
        let s = session();
        for id in [1, 30, 31] {
            h.engine
                .record_response(Response::new(s.id, id, "let"))
                .await
                .unwrap();
        }
        let first = h.engine.select_next_question(&s).unwrap().id;
        for _ in 0..5 {
            assert_eq!(h.engine.select_next_question(&s).unwrap().id, first);
        }
    }

    #[tokio::test]
    async fn exhausted_pool_returns_none() {
        let h = harness();
        let s = session();
        let all_ids: Vec<u64> = (1..=16).chain([20, 30, 31]).collect();
        for id in all_ids {
            h.engine
                .record_response(Response::new(s.id, id, "let"))
                .await
                .unwrap();
        }
        assert!(h.engine.select_next_question(&s).is_none());
    }

    #[tokio::test]
    async fn progress_reports_counts_and_averages() {
        let h = harness();
        let mut s = session();
        s.target_role = Some("data".into());
        s.status = SessionStatus::InProgress;

        let progress = h.engine.get_progress(&s);
        assert_eq!(progress.answered, 0);
        // Role "data" matches only the sql question.
        assert_eq!(progress.total, 1);
        assert!(progress.should_continue);
        assert!((progress.overall_progress - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn similarity_pass_updates_stored_response() {
        let h = harness_with(|e| e.with_semantic_scorer(Arc::new(FixedSimilarity(0.9))));
        let s = session();
        h.engine
            .record_response(Response::new(s.id, 20, "ownership moves values"))
            .await
            .unwrap();

        for _ in 0..20 {
            tokio::task::yield_now().await;
            let stored = h.responses.all();
            if stored[0].similarity_score.is_some() {
                break;
            }
        }
        assert_eq!(h.responses.all()[0].similarity_score, Some(0.9));
    }

    #[tokio::test]
    async fn recommended_questions_are_ranked_and_bounded() {
        let h = harness();
        let s = session();
        let top = h.engine.recommended_questions(&s, 5);
        assert_eq!(top.len(), 5);
    }

    #[tokio::test]
    async fn rebuild_and_refresh_hooks_are_callable() {
        let h = harness();
        h.engine.rebuild_graph();
        h.engine.refresh_catalog();
        assert!(!h.engine.graph_has_cycles());
    }

    #[tokio::test]
    async fn end_session_drops_belief_state() {
        let h = harness();
        let s = session();
        h.engine
            .record_response(Response::new(s.id, 1, "let"))
            .await
            .unwrap();
        assert!(h.engine.belief_row(s.id, "rust").is_some());
        h.engine.end_session(s.id);
        assert!(h.engine.belief_row(s.id, "rust").is_none());
    }
}
