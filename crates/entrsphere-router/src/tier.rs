// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost-tiered model selection.
//!
//! Orchestrates model choice: global force override > ordered escalation
//! rules > low-cost fallthrough. Every branch is defined, so selection is
//! total over its input.

use std::str::FromStr;

use entrsphere_config::model::TieringConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::context::{ConversationContext, ConversationPhase};
use crate::signals::Category;

/// Backing model cost/capability tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ModelTier {
    LowCost,
    HighCost,
}

/// Generation parameters passed alongside the model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Tier decision with the concrete model and parameters to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDecision {
    pub tier: ModelTier,
    pub model: String,
    pub parameters: GenerationParameters,
    /// Human-readable reason for the decision.
    pub reason: String,
    /// Whether `tiering.force_tier` bypassed the rules.
    pub forced: bool,
}

/// Cutoffs the escalation predicates compare signal shares against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierCutoffs {
    pub c_weight: f64,
    pub d_weight: f64,
}

/// One entry of the ordered escalation list.
#[derive(Clone, Copy)]
pub struct TierRule {
    pub reason: &'static str,
    pub tier: ModelTier,
    pub predicate: fn(&ConversationContext, &TierCutoffs) -> bool,
}

impl std::fmt::Debug for TierRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierRule")
            .field("reason", &self.reason)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

/// Reason reported when no escalation rule matches.
pub const FALLTHROUGH_REASON: &str = "no escalation signals";

/// Production escalation rules, highest priority first.
pub fn default_rules() -> Vec<TierRule> {
    vec![
        TierRule {
            reason: "spec generation phase",
            tier: ModelTier::HighCost,
            predicate: |ctx, _| ctx.phase == ConversationPhase::SpecGeneration,
        },
        TierRule {
            reason: "political complexity or strategic ambiguity",
            tier: ModelTier::HighCost,
            predicate: |ctx, cutoffs| {
                ctx.political_complexity || ctx.signals[Category::C] > cutoffs.c_weight
            },
        },
        TierRule {
            reason: "conflicting signals",
            tier: ModelTier::HighCost,
            predicate: |ctx, _| ctx.conflicting_signals,
        },
        TierRule {
            reason: "integration complexity",
            tier: ModelTier::HighCost,
            predicate: |ctx, cutoffs| {
                ctx.integration_complexity && ctx.signals[Category::D] > cutoffs.d_weight
            },
        },
        TierRule {
            reason: "deep analysis requested",
            tier: ModelTier::HighCost,
            predicate: |ctx, _| ctx.deep_analysis_requested,
        },
    ]
}

/// Picks a model tier for each request.
#[derive(Debug, Clone)]
pub struct TierSelector {
    rules: Vec<TierRule>,
    cutoffs: TierCutoffs,
    config: TieringConfig,
    forced: Option<ModelTier>,
}

impl TierSelector {
    pub fn new(config: TieringConfig) -> Self {
        Self::with_rules(config, default_rules())
    }

    /// Selector with a custom rule list, evaluated in order.
    pub fn with_rules(config: TieringConfig, rules: Vec<TierRule>) -> Self {
        let forced = config.force_tier.as_deref().and_then(|name| {
            ModelTier::from_str(name)
                .inspect_err(|_| warn!(force_tier = name, "ignoring unknown force_tier"))
                .ok()
        });
        Self {
            rules,
            cutoffs: TierCutoffs {
                c_weight: config.c_weight_cutoff,
                d_weight: config.d_weight_cutoff,
            },
            config,
            forced,
        }
    }

    pub fn rules(&self) -> &[TierRule] {
        &self.rules
    }

    /// Evaluate the rule list only, ignoring any force override.
    pub fn classify(&self, context: &ConversationContext) -> (ModelTier, &'static str) {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(context, &self.cutoffs))
            .map(|rule| (rule.tier, rule.reason))
            .unwrap_or((ModelTier::LowCost, FALLTHROUGH_REASON))
    }

    /// Select tier, model and generation parameters for `context`.
    pub fn select(&self, context: &ConversationContext) -> TierDecision {
        if let Some(tier) = self.forced {
            info!(%tier, "tier forced by configuration");
            return self.decision(tier, context.phase, "global force_tier config", true);
        }

        let (tier, reason) = self.classify(context);
        if tier == ModelTier::HighCost {
            info!(
                %tier,
                reason,
                phase = %context.phase,
                turns = context.turn_count,
                "escalating to high-cost model"
            );
        } else {
            debug!(%tier, phase = %context.phase, "staying on low-cost model");
        }
        self.decision(tier, context.phase, reason, false)
    }

    /// Output budget and sampling temperature for `tier` in `phase`.
    pub fn tier_parameters(&self, tier: ModelTier, phase: ConversationPhase) -> GenerationParameters {
        let temps = &self.config.temperature;
        GenerationParameters {
            max_tokens: self.max_tokens_for_tier(tier),
            temperature: match phase {
                ConversationPhase::Interview => temps.interview,
                ConversationPhase::Routing => temps.routing,
                ConversationPhase::DeepDive => temps.deep_dive,
                ConversationPhase::SpecGeneration => temps.spec_generation,
            },
        }
    }

    pub fn model_for_tier(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::LowCost => &self.config.low_cost_model,
            ModelTier::HighCost => &self.config.high_cost_model,
        }
    }

    fn max_tokens_for_tier(&self, tier: ModelTier) -> u32 {
        match tier {
            ModelTier::LowCost => self.config.low_cost_max_tokens,
            ModelTier::HighCost => self.config.high_cost_max_tokens,
        }
    }

    fn decision(
        &self,
        tier: ModelTier,
        phase: ConversationPhase,
        reason: &str,
        forced: bool,
    ) -> TierDecision {
        TierDecision {
            tier,
            model: self.model_for_tier(tier).to_string(),
            parameters: self.tier_parameters(tier, phase),
            reason: reason.to_string(),
            forced,
        }
    }
}

impl Default for TierSelector {
    fn default() -> Self {
        Self::new(TieringConfig::default())
    }
}
