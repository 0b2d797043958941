// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints serde cannot express: non-negative
//! thresholds, fractions inside `0..=1`, and coherent tier budgets.

use crate::diagnostic::ConfigError;
use crate::model::EntrsphereConfig;

/// Tier names accepted by `tiering.force_tier`.
pub const TIER_NAMES: &[&str] = &["low-cost", "high-cost"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &EntrsphereConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, value) in [
        ("routing.c_threshold", config.routing.c_threshold),
        ("routing.d_threshold", config.routing.d_threshold),
        ("routing.b_threshold", config.routing.b_threshold),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be a non-negative number, got {value}"),
            });
        }
    }

    if let Some(path) = &config.routing.catalog_path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "routing.catalog_path must not be empty when set".to_string(),
        });
    }

    let tiering = &config.tiering;

    for (key, value) in [
        ("tiering.conflict_margin", tiering.conflict_margin),
        ("tiering.conflict_floor", tiering.conflict_floor),
        ("tiering.c_weight_cutoff", tiering.c_weight_cutoff),
        ("tiering.d_weight_cutoff", tiering.d_weight_cutoff),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be between 0.0 and 1.0, got {value}"),
            });
        }
    }

    if let Some(tier) = &tiering.force_tier
        && !TIER_NAMES.contains(&tier.as_str())
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "tiering.force_tier `{tier}` is not a tier; expected one of {}",
                TIER_NAMES.join(", ")
            ),
        });
    }

    for (key, model) in [
        ("tiering.low_cost_model", &tiering.low_cost_model),
        ("tiering.high_cost_model", &tiering.high_cost_model),
    ] {
        if model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if tiering.low_cost_max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "tiering.low_cost_max_tokens must be at least 1".to_string(),
        });
    }

    if tiering.high_cost_max_tokens <= tiering.low_cost_max_tokens {
        errors.push(ConfigError::Validation {
            message: format!(
                "tiering.high_cost_max_tokens ({}) must be greater than tiering.low_cost_max_tokens ({})",
                tiering.high_cost_max_tokens, tiering.low_cost_max_tokens
            ),
        });
    }

    let temps = &tiering.temperature;
    for (key, value) in [
        ("tiering.temperature.interview", temps.interview),
        ("tiering.temperature.routing", temps.routing),
        ("tiering.temperature.deep_dive", temps.deep_dive),
        ("tiering.temperature.spec_generation", temps.spec_generation),
    ] {
        if !(0.0..=2.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be between 0.0 and 2.0, got {value}"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
