// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the EntrSphere discovery router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level EntrSphere configuration.
///
/// Every section is optional and defaults to the production policy values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EntrsphereConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Route classification thresholds and question catalog.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Model tier selection policy.
    #[serde(default)]
    pub tiering: TieringConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Display name used in CLI banners and log fields.
    #[serde(default = "default_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_name() -> String {
    "EntrSphere Discovery Router".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Route classification configuration.
///
/// A route is chosen when its category's accumulated count reaches the
/// threshold. Rules are checked C, then D, then B; Route A is the fallback.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Minimum Category C count for Route C (strategic ambiguity).
    #[serde(default = "default_route_threshold")]
    pub c_threshold: f64,

    /// Minimum Category D count for Route D (integration complexity).
    #[serde(default = "default_route_threshold")]
    pub d_threshold: f64,

    /// Minimum Category B count for Route B (exploratory).
    #[serde(default = "default_route_threshold")]
    pub b_threshold: f64,

    /// Path to a TOML question catalog replacing the built-in one.
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            c_threshold: default_route_threshold(),
            d_threshold: default_route_threshold(),
            b_threshold: default_route_threshold(),
            catalog_path: None,
        }
    }
}

fn default_route_threshold() -> f64 {
    2.0
}

/// Model tier selection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TieringConfig {
    /// Force every request onto one tier ("low-cost" or "high-cost").
    #[serde(default)]
    pub force_tier: Option<String>,

    /// Model identifier for the low-cost tier.
    #[serde(default = "default_low_cost_model")]
    pub low_cost_model: String,

    /// Model identifier for the high-cost tier.
    #[serde(default = "default_high_cost_model")]
    pub high_cost_model: String,

    /// Max output tokens for low-cost responses.
    #[serde(default = "default_low_cost_max_tokens")]
    pub low_cost_max_tokens: u32,

    /// Max output tokens for high-cost responses.
    #[serde(default = "default_high_cost_max_tokens")]
    pub high_cost_max_tokens: u32,

    /// Two leading signal shares closer than this count as conflicting.
    #[serde(default = "default_conflict_margin")]
    pub conflict_margin: f64,

    /// The leading share must exceed this before a conflict is reported.
    #[serde(default = "default_conflict_floor")]
    pub conflict_floor: f64,

    /// Category C share above which the high-cost tier is used.
    #[serde(default = "default_c_weight_cutoff")]
    pub c_weight_cutoff: f64,

    /// Category D share above which integration complexity escalates.
    #[serde(default = "default_d_weight_cutoff")]
    pub d_weight_cutoff: f64,

    /// Turn count at which the conversation is assumed to be routing.
    #[serde(default = "default_routing_turn_threshold")]
    pub routing_turn_threshold: usize,

    /// Sampling temperature per conversation phase.
    #[serde(default)]
    pub temperature: TemperatureConfig,
}

impl Default for TieringConfig {
    fn default() -> Self {
        Self {
            force_tier: None,
            low_cost_model: default_low_cost_model(),
            high_cost_model: default_high_cost_model(),
            low_cost_max_tokens: default_low_cost_max_tokens(),
            high_cost_max_tokens: default_high_cost_max_tokens(),
            conflict_margin: default_conflict_margin(),
            conflict_floor: default_conflict_floor(),
            c_weight_cutoff: default_c_weight_cutoff(),
            d_weight_cutoff: default_d_weight_cutoff(),
            routing_turn_threshold: default_routing_turn_threshold(),
            temperature: TemperatureConfig::default(),
        }
    }
}

fn default_low_cost_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_high_cost_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_low_cost_max_tokens() -> u32 {
    1024
}

fn default_high_cost_max_tokens() -> u32 {
    4096
}

fn default_conflict_margin() -> f64 {
    0.15
}

fn default_conflict_floor() -> f64 {
    0.2
}

fn default_c_weight_cutoff() -> f64 {
    0.4
}

fn default_d_weight_cutoff() -> f64 {
    0.5
}

fn default_routing_turn_threshold() -> usize {
    10
}

/// Sampling temperature for each conversation phase.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureConfig {
    #[serde(default = "default_interview_temperature")]
    pub interview: f32,

    #[serde(default = "default_routing_temperature")]
    pub routing: f32,

    #[serde(default = "default_deep_dive_temperature")]
    pub deep_dive: f32,

    #[serde(default = "default_spec_generation_temperature")]
    pub spec_generation: f32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            interview: default_interview_temperature(),
            routing: default_routing_temperature(),
            deep_dive: default_deep_dive_temperature(),
            spec_generation: default_spec_generation_temperature(),
        }
    }
}

fn default_interview_temperature() -> f32 {
    0.7
}

fn default_routing_temperature() -> f32 {
    0.5
}

fn default_deep_dive_temperature() -> f32 {
    0.6
}

fn default_spec_generation_temperature() -> f32 {
    0.3
}
