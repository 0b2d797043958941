// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interview session state machine.
//!
//! `NotStarted -> InProgress(0) -> ... -> InProgress(N-1) -> RouteResolved`.
//! Transitions only move forward. Advancing past the last question resolves
//! the route; contact capture and completion messaging happen outside this
//! crate once a session is resolved.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use entrsphere_config::model::RoutingConfig;
use entrsphere_core::SessionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{CatalogError, Question, QuestionCatalog};
use crate::classifier::{self, Route, RouteClassifier};
use crate::drift::{DriftObserver, IgnoreReason, TracingDriftObserver};
use crate::signals::{Category, SignalVector};

/// Question index of a session that has not shown its first question.
pub const NOT_STARTED: i32 = -1;

/// Where a session is in the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    InProgress { question_index: usize },
    RouteResolved,
}

/// Routing-relevant state of one discovery interview.
///
/// Deserialization rejects records whose phase, index and route disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord")]
pub struct InterviewSession {
    id: SessionId,
    current_index: i32,
    phase: SessionPhase,
    signals: SignalVector,
    answers: BTreeMap<String, String>,
    route: Option<Route>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A stored session whose fields contradict each other.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionStateError {
    #[error("session in phase {phase:?} has question index {index}")]
    IndexMismatch { phase: SessionPhase, index: i32 },
    #[error("resolved session has no route")]
    MissingRoute,
    #[error("unresolved session already carries route {0}")]
    UnexpectedRoute(Route),
}

/// Unchecked wire form of [`InterviewSession`].
#[derive(Deserialize)]
struct SessionRecord {
    id: SessionId,
    current_index: i32,
    phase: SessionPhase,
    signals: SignalVector,
    answers: BTreeMap<String, String>,
    route: Option<Route>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SessionRecord> for InterviewSession {
    type Error = SessionStateError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let index = record.current_index;
        let index_ok = match record.phase {
            SessionPhase::NotStarted => index == NOT_STARTED,
            SessionPhase::InProgress { question_index } => {
                usize::try_from(index).is_ok_and(|i| i == question_index)
            }
            SessionPhase::RouteResolved => index >= 0,
        };
        if !index_ok {
            return Err(SessionStateError::IndexMismatch {
                phase: record.phase,
                index,
            });
        }

        match (record.phase, record.route) {
            (SessionPhase::RouteResolved, None) => return Err(SessionStateError::MissingRoute),
            (SessionPhase::NotStarted | SessionPhase::InProgress { .. }, Some(route)) => {
                return Err(SessionStateError::UnexpectedRoute(route));
            }
            _ => {}
        }

        Ok(Self {
            id: record.id,
            current_index: index,
            phase: record.phase,
            signals: record.signals,
            answers: record.answers,
            route: record.route,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl InterviewSession {
    fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            current_index: NOT_STARTED,
            phase: SessionPhase::NotStarted,
            signals: SignalVector::new(),
            answers: BTreeMap::new(),
            route: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// `-1` before the first question, then `0..N-1`, then `N` once resolved.
    pub fn current_index(&self) -> i32 {
        self.current_index
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn signals(&self) -> &SignalVector {
        &self.signals
    }

    /// Chosen option id per question id.
    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    /// `None` until the last question has been passed.
    pub fn route(&self) -> Option<Route> {
        self.route
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == SessionPhase::RouteResolved
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was stored and its categories were credited.
    Recorded { contributed: Vec<Category> },
    /// The answer was dropped; the session is unchanged.
    Ignored(IgnoreReason),
}

/// Drives interview sessions against a catalog and classifier.
///
/// Holds only immutable configuration, so one engine can be shared across
/// request handlers. Callers must serialize writes to any single session.
#[derive(Clone)]
pub struct DiscoveryEngine {
    catalog: Arc<QuestionCatalog>,
    classifier: RouteClassifier,
    observer: Arc<dyn DriftObserver>,
}

impl DiscoveryEngine {
    pub fn new(catalog: Arc<QuestionCatalog>, classifier: RouteClassifier) -> Self {
        Self {
            catalog,
            classifier,
            observer: Arc::new(TracingDriftObserver),
        }
    }

    /// Build from `[routing]` config, loading `catalog_path` if one is set.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let catalog = QuestionCatalog::from_path(std::path::Path::new(path))?;
                info!(path = path.as_str(), questions = catalog.len(), "loaded question catalog");
                catalog
            }
            None => QuestionCatalog::default(),
        };
        Ok(Self::new(
            Arc::new(catalog),
            RouteClassifier::from_config(config),
        ))
    }

    /// Replace the drift observer.
    pub fn with_observer(mut self, observer: Arc<dyn DriftObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    /// A fresh session in the `NotStarted` phase with an all-zero vector.
    pub fn start_session(&self) -> InterviewSession {
        self.start_session_with_id(SessionId::generate())
    }

    pub fn start_session_with_id(&self, id: SessionId) -> InterviewSession {
        debug!(session_id = %id, "interview session created");
        InterviewSession::new(id)
    }

    pub fn phase(&self, session: &InterviewSession) -> SessionPhase {
        session.phase
    }

    /// The question the session is currently waiting on, if any.
    pub fn current_question<'a>(&'a self, session: &InterviewSession) -> Option<&'a Question> {
        match session.phase {
            SessionPhase::InProgress { question_index } => self.catalog.get(question_index),
            _ => None,
        }
    }

    /// Record `option_id` as the answer to `question_id`.
    ///
    /// Unknown questions, unknown options, repeat answers and answers after
    /// resolution are ignored: the session is left exactly as it was and the
    /// drift observer is notified.
    pub fn record_answer(
        &self,
        session: &mut InterviewSession,
        question_id: &str,
        option_id: &str,
    ) -> AnswerOutcome {
        let checked = if session.is_resolved() {
            Err(IgnoreReason::SessionResolved)
        } else if session.answers.contains_key(question_id) {
            Err(IgnoreReason::AlreadyAnswered)
        } else {
            self.catalog
                .question(question_id)
                .ok_or(IgnoreReason::UnknownQuestion)
                .and_then(|q| q.option(option_id).map(|_| q).ok_or(IgnoreReason::UnknownOption))
        };

        let question = match checked {
            Ok(question) => question,
            Err(reason) => {
                self.observer
                    .answer_ignored(&session.id, question_id, option_id, reason);
                return AnswerOutcome::Ignored(reason);
            }
        };

        classifier::record_answer(&mut session.signals, question, option_id);
        session
            .answers
            .insert(question_id.to_string(), option_id.to_string());
        session.updated_at = Utc::now();

        let contributed = question
            .option(option_id)
            .map(|o| o.signals.clone())
            .unwrap_or_default();
        debug!(
            session_id = %session.id,
            question_id,
            option_id,
            signals = %session.signals,
            "answer recorded"
        );
        AnswerOutcome::Recorded { contributed }
    }

    /// Move to the next question, resolving the route after the last one.
    ///
    /// Calling this on a resolved session is a no-op.
    pub fn advance_question(&self, session: &mut InterviewSession) -> SessionPhase {
        if session.is_resolved() {
            return session.phase;
        }

        let question_count = self.catalog.len();
        let next = usize::try_from(session.current_index + 1).unwrap_or(0);

        if next < question_count {
            session.current_index = next as i32;
            session.phase = SessionPhase::InProgress {
                question_index: next,
            };
        } else {
            session.current_index = i32::try_from(question_count).unwrap_or(i32::MAX);
            let route = self.classifier.resolve(&session.signals);
            session.route = Some(route);
            session.phase = SessionPhase::RouteResolved;
            info!(
                session_id = %session.id,
                %route,
                signals = %session.signals,
                answered = session.answers.len(),
                "interview route resolved"
            );
        }

        session.updated_at = Utc::now();
        session.phase
    }
}

impl Default for DiscoveryEngine {
    fn default() -> Self {
        Self::new(Arc::new(QuestionCatalog::default()), RouteClassifier::default())
    }
}

impl std::fmt::Debug for DiscoveryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryEngine")
            .field("questions", &self.catalog.len())
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::QuestionOption;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<(String, String, IgnoreReason)>>,
    }

    impl DriftObserver for RecordingObserver {
        fn answer_ignored(&self, _: &SessionId, q: &str, o: &str, reason: IgnoreReason) {
            self.events
                .lock()
                .unwrap()
                .push((q.to_string(), o.to_string(), reason));
        }
    }

    fn question(id: &str, opts: &[(&str, &[Category])]) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("{id}?"),
            subtext: None,
            options: opts
                .iter()
                .map(|(oid, signals)| QuestionOption {
                    id: oid.to_string(),
                    label: oid.to_string(),
                    signals: signals.to_vec(),
                })
                .collect(),
        }
    }

    fn two_question_engine() -> DiscoveryEngine {
        let catalog = QuestionCatalog::new(vec![
            question("first", &[("c", &[Category::C]), ("none", &[])]),
            question("second", &[("c", &[Category::C]), ("d", &[Category::D])]),
        ])
        .unwrap();
        DiscoveryEngine::new(Arc::new(catalog), RouteClassifier::default())
    }

    #[test]
    fn new_session_has_not_started() {
        let engine = DiscoveryEngine::default();
        let session = engine.start_session();
        assert_eq!(session.current_index(), NOT_STARTED);
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(engine.phase(&session), SessionPhase::NotStarted);
        assert!(session.signals().is_empty());
        assert_eq!(session.route(), None);
        assert!(engine.current_question(&session).is_none());
    }

    #[test]
    fn advances_through_every_question_then_resolves() {
        let engine = two_question_engine();
        let mut session = engine.start_session();

        assert_eq!(
            engine.advance_question(&mut session),
            SessionPhase::InProgress { question_index: 0 }
        );
        assert_eq!(engine.current_question(&session).unwrap().id, "first");

        assert_eq!(
            engine.advance_question(&mut session),
            SessionPhase::InProgress { question_index: 1 }
        );
        assert_eq!(session.route(), None);

        assert_eq!(engine.advance_question(&mut session), SessionPhase::RouteResolved);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.route(), Some(Route::A));
        assert!(engine.current_question(&session).is_none());
    }

    #[test]
    fn resolved_session_does_not_move() {
        let engine = two_question_engine();
        let mut session = engine.start_session();
        for _ in 0..3 {
            engine.advance_question(&mut session);
        }
        let snapshot = session.clone();
        assert_eq!(engine.advance_question(&mut session), SessionPhase::RouteResolved);
        assert_eq!(session, snapshot);
    }

    #[test]
    fn answers_accumulate_and_drive_resolution() {
        let engine = two_question_engine();
        let mut session = engine.start_session();
        engine.advance_question(&mut session);

        assert_eq!(
            engine.record_answer(&mut session, "first", "c"),
            AnswerOutcome::Recorded {
                contributed: vec![Category::C]
            }
        );
        engine.advance_question(&mut session);
        engine.record_answer(&mut session, "second", "c");
        engine.advance_question(&mut session);

        assert_eq!(session.signals()[Category::C], 2.0);
        assert_eq!(session.route(), Some(Route::C));
        assert_eq!(session.answers().get("first").map(String::as_str), Some("c"));
    }

    #[test]
    fn ignored_answers_leave_session_untouched_and_notify() {
        let observer = Arc::new(RecordingObserver::default());
        let engine = two_question_engine().with_observer(observer.clone());
        let mut session = engine.start_session();
        engine.advance_question(&mut session);
        engine.record_answer(&mut session, "first", "c");
        let snapshot = session.clone();

        assert_eq!(
            engine.record_answer(&mut session, "nope", "c"),
            AnswerOutcome::Ignored(IgnoreReason::UnknownQuestion)
        );
        assert_eq!(
            engine.record_answer(&mut session, "second", "zzz"),
            AnswerOutcome::Ignored(IgnoreReason::UnknownOption)
        );
        assert_eq!(
            engine.record_answer(&mut session, "first", "none"),
            AnswerOutcome::Ignored(IgnoreReason::AlreadyAnswered)
        );
        assert_eq!(session, snapshot);

        let events = observer.events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], ("second".to_string(), "zzz".to_string(), IgnoreReason::UnknownOption));
    }

    #[test]
    fn answers_after_resolution_are_ignored() {
        let engine = two_question_engine();
        let mut session = engine.start_session();
        for _ in 0..3 {
            engine.advance_question(&mut session);
        }
        assert_eq!(
            engine.record_answer(&mut session, "first", "c"),
            AnswerOutcome::Ignored(IgnoreReason::SessionResolved)
        );
        assert!(session.signals().is_empty());
    }

    #[test]
    fn session_round_trips_through_json() {
        let engine = DiscoveryEngine::default();
        let mut session = engine.start_session();
        engine.advance_question(&mut session);
        engine.record_answer(&mut session, "situation", "exploring");

        let json = serde_json::to_string(&session).unwrap();
        let restored: InterviewSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn inconsistent_stored_sessions_are_rejected() {
        let engine = DiscoveryEngine::default();
        let mut session = engine.start_session();
        engine.advance_question(&mut session);
        let valid = serde_json::to_value(&session).unwrap();

        let mut resolved_without_route = valid.clone();
        resolved_without_route["phase"] = serde_json::json!({ "state": "route_resolved" });
        let err = serde_json::from_value::<InterviewSession>(resolved_without_route).unwrap_err();
        assert!(err.to_string().contains("resolved session has no route"));

        let mut index_mismatch = valid.clone();
        index_mismatch["current_index"] = serde_json::json!(3);
        let err = serde_json::from_value::<InterviewSession>(index_mismatch).unwrap_err();
        assert!(err.to_string().contains("question index 3"));

        let mut early_route = valid;
        early_route["route"] = serde_json::json!("C");
        let err = serde_json::from_value::<InterviewSession>(early_route).unwrap_err();
        assert!(err.to_string().contains("already carries route C"));
    }

    #[test]
    fn resolved_session_round_trips() {
        let engine = DiscoveryEngine::default();
        let mut session = engine.start_session();
        while !session.is_resolved() {
            engine.advance_question(&mut session);
        }
        let json = serde_json::to_string(&session).unwrap();
        let restored: InterviewSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn from_config_uses_builtin_catalog_by_default() {
        let engine = DiscoveryEngine::from_config(&RoutingConfig::default()).unwrap();
        assert_eq!(engine.catalog().len(), 5);
    }

    #[test]
    fn from_config_reports_missing_catalog_file() {
        let config = RoutingConfig {
            catalog_path: Some("/nonexistent/entrsphere/questions.toml".to_string()),
            ..RoutingConfig::default()
        };
        assert!(matches!(
            DiscoveryEngine::from_config(&config),
            Err(CatalogError::Io { .. })
        ));
    }
}
