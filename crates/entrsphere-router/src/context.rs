// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation context analysis for tier selection.
//!
//! Summarizes a transcript plus the current signal vector into the flags and
//! phase the tier selector consumes. Recomputed from scratch on every call;
//! nothing here is persisted. All matching is case-insensitive substring
//! search over fixed keyword lists.

use entrsphere_config::model::TieringConfig;
use entrsphere_core::{ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::signals::{Category, SignalVector};

/// Words that suggest organizational politics or approval chains.
pub const POLITICAL_KEYWORDS: &[&str] = &[
    "stakeholder",
    "approval",
    "sign-off",
    "politics",
    "it depends",
    "alignment",
    "buy-in",
    "committee",
    "board",
];

/// Words that suggest integration with existing systems.
pub const INTEGRATION_KEYWORDS: &[&str] = &[
    "api",
    "integration",
    "legacy",
    "migrate",
    "salesforce",
    "hubspot",
    "quickbooks",
    "shopify",
    "stripe",
    "database",
    "sync",
    "webhook",
    "existing system",
];

/// Phrases in the latest message that ask for deeper analysis.
pub const DEEP_ANALYSIS_PHRASES: &[&str] = &[
    "analyze deeper",
    "more detail",
    "comprehensive",
    "thorough",
    "edge cases",
    "what about",
    "consider",
];

/// Transcript markers that move the phase to routing.
pub const ROUTING_MARKERS: &[&str] = &["route detected"];

/// Transcript markers that move the phase to deep-dive.
pub const DEEP_DIVE_MARKERS: &[&str] = &["deep dive", "let's document"];

/// Transcript markers that move the phase to spec generation.
pub const SPEC_GENERATION_MARKERS: &[&str] = &["generate spec", "spec.json"];

/// Free-text cues per category, used when no structured answers exist.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::A,
        &["clear goal", "know exactly", "straightforward", "simple", "well-defined", "just need"],
    ),
    (
        Category::B,
        &["not sure", "exploring", "figure out", "maybe", "brainstorm", "rough idea"],
    ),
    (
        Category::C,
        &["complicated", "stakeholder", "politics", "disagree", "different opinions", "avoid"],
    ),
    (
        Category::D,
        &["integrat", "legacy", "api", "existing system", "migrate", "sync"],
    ),
];

/// Coarse stage of the conversation. Ordered: later phases never downgrade.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ConversationPhase {
    Interview,
    Routing,
    DeepDive,
    SpecGeneration,
}

/// Where the context's signal distribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SignalSource {
    /// The caller's accumulated answer vector.
    Answers,
    /// Derived from keyword hits in user messages.
    FreeText,
}

/// Keyword lists the analyzer matches against. Substitutable for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSets {
    pub political: Vec<String>,
    pub integration: Vec<String>,
    pub deep_analysis: Vec<String>,
    pub routing_markers: Vec<String>,
    pub deep_dive_markers: Vec<String>,
    pub spec_generation_markers: Vec<String>,
    pub category_cues: Vec<(Category, Vec<String>)>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self {
            political: owned(POLITICAL_KEYWORDS),
            integration: owned(INTEGRATION_KEYWORDS),
            deep_analysis: owned(DEEP_ANALYSIS_PHRASES),
            routing_markers: owned(ROUTING_MARKERS),
            deep_dive_markers: owned(DEEP_DIVE_MARKERS),
            spec_generation_markers: owned(SPEC_GENERATION_MARKERS),
            category_cues: CATEGORY_KEYWORDS
                .iter()
                .map(|(c, words)| (*c, owned(words)))
                .collect(),
        }
    }
}

/// `haystack` must already be lowercase; keywords are stored lowercase.
fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

/// Derived, per-request summary of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Signal distribution as shares of the total (all zero if no signal).
    pub signals: SignalVector,
    pub signal_source: SignalSource,
    pub phase: ConversationPhase,
    pub turn_count: usize,
    pub conflicting_signals: bool,
    pub political_complexity: bool,
    pub integration_complexity: bool,
    pub deep_analysis_requested: bool,
}

impl ConversationContext {
    /// Neutral context: interview phase, no flags, no signal.
    pub fn neutral() -> Self {
        Self {
            signals: SignalVector::new(),
            signal_source: SignalSource::Answers,
            phase: ConversationPhase::Interview,
            turn_count: 0,
            conflicting_signals: false,
            political_complexity: false,
            integration_complexity: false,
            deep_analysis_requested: false,
        }
    }
}

/// Builds [`ConversationContext`] values from transcripts.
#[derive(Debug, Clone)]
pub struct ContextAnalyzer {
    keywords: KeywordSets,
    conflict_margin: f64,
    conflict_floor: f64,
    routing_turn_threshold: usize,
}

impl ContextAnalyzer {
    pub fn new(
        keywords: KeywordSets,
        conflict_margin: f64,
        conflict_floor: f64,
        routing_turn_threshold: usize,
    ) -> Self {
        Self {
            keywords,
            conflict_margin,
            conflict_floor,
            routing_turn_threshold,
        }
    }

    pub fn from_config(config: &TieringConfig) -> Self {
        Self::new(
            KeywordSets::default(),
            config.conflict_margin,
            config.conflict_floor,
            config.routing_turn_threshold,
        )
    }

    pub fn keywords(&self) -> &KeywordSets {
        &self.keywords
    }

    /// Summarize `history` and `signals` for tier selection.
    ///
    /// When `signals` is empty (free-text-only conversation) a vector is
    /// derived from user-message keywords instead.
    pub fn analyze(&self, history: &[ChatMessage], signals: &SignalVector) -> ConversationContext {
        let transcript = history
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");
        let latest = history
            .last()
            .map(|m| m.content.to_lowercase())
            .unwrap_or_default();

        let (raw, signal_source) = if signals.is_empty() {
            (self.free_text_signals(history), SignalSource::FreeText)
        } else {
            (*signals, SignalSource::Answers)
        };
        let shares = raw.normalized();

        let turn_count = history.len();
        let context = ConversationContext {
            signals: shares,
            signal_source,
            phase: self.infer_phase(&transcript, turn_count),
            turn_count,
            conflicting_signals: self.has_conflicting_signals(&shares),
            political_complexity: contains_any(&transcript, &self.keywords.political),
            integration_complexity: contains_any(&transcript, &self.keywords.integration),
            deep_analysis_requested: contains_any(&latest, &self.keywords.deep_analysis),
        };

        debug!(
            phase = %context.phase,
            turns = turn_count,
            source = %signal_source,
            conflicting = context.conflicting_signals,
            political = context.political_complexity,
            integration = context.integration_complexity,
            deep_analysis = context.deep_analysis_requested,
            "conversation context analyzed"
        );
        context
    }

    /// Phase from turn count and transcript markers (`transcript` lowercase).
    ///
    /// Checks run in order and only ever upgrade the phase.
    pub fn infer_phase(&self, transcript: &str, turn_count: usize) -> ConversationPhase {
        let mut phase = ConversationPhase::Interview;
        let upgrades = [
            (
                turn_count >= self.routing_turn_threshold
                    || contains_any(transcript, &self.keywords.routing_markers),
                ConversationPhase::Routing,
            ),
            (
                contains_any(transcript, &self.keywords.deep_dive_markers),
                ConversationPhase::DeepDive,
            ),
            (
                contains_any(transcript, &self.keywords.spec_generation_markers),
                ConversationPhase::SpecGeneration,
            ),
        ];
        for (hit, candidate) in upgrades {
            if hit {
                phase = phase.max(candidate);
            }
        }
        phase
    }

    /// Two leading weights within the margin, with the leader above the floor.
    pub fn has_conflicting_signals(&self, shares: &SignalVector) -> bool {
        let (first, second) = shares.top_two();
        first > self.conflict_floor && (first - second) < self.conflict_margin
    }

    /// One unit per distinct category cue found in user messages.
    pub fn free_text_signals(&self, history: &[ChatMessage]) -> SignalVector {
        let user_text = history
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");

        let mut signals = SignalVector::new();
        for (category, cues) in &self.keywords.category_cues {
            let hits = cues.iter().filter(|cue| user_text.contains(cue.as_str())).count();
            signals.add(*category, hits as f64);
        }
        signals
    }
}

impl Default for ContextAnalyzer {
    fn default() -> Self {
        Self::from_config(&TieringConfig::default())
    }
}
