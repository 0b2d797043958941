// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route classification and model tiering for EntrSphere discovery interviews.
//!
//! This crate provides:
//! - [`SignalVector`]: per-category signal accumulation (A/B/C/D)
//! - [`QuestionCatalog`]: the structured questionnaire, built-in or loaded from TOML
//! - [`RouteClassifier`]: priority-ordered threshold rules resolving a [`Route`]
//! - [`DiscoveryEngine`]: the interview session state machine
//! - [`ContextAnalyzer`]: transcript summarization into a [`ConversationContext`]
//! - [`TierSelector`]: low-cost vs high-cost model selection with generation parameters
//!
//! Everything here is synchronous, pure computation over values the caller
//! passes in. Persistence, transport and model calls belong to the caller.

pub mod catalog;
pub mod classifier;
pub mod context;
pub mod drift;
pub mod session;
pub mod signals;
pub mod tier;

pub use catalog::{CatalogError, Question, QuestionCatalog, QuestionOption};
pub use classifier::{record_answer, Route, RouteClassifier, RouteRule};
pub use context::{
    ContextAnalyzer, ConversationContext, ConversationPhase, KeywordSets, SignalSource,
};
pub use drift::{DriftObserver, IgnoreReason, TracingDriftObserver};
pub use session::{AnswerOutcome, DiscoveryEngine, InterviewSession, SessionPhase, SessionStateError};
pub use signals::{Category, SignalVector};
pub use tier::{GenerationParameters, ModelTier, TierDecision, TierRule, TierSelector};
