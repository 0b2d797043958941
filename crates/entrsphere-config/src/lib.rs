// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the EntrSphere discovery router.
//!
//! Route thresholds, tiering cutoffs, model identifiers and output budgets are
//! policy parameters rather than code, so they live here. Configuration is
//! parsed from TOML with strict validation (`deny_unknown_fields`), layered
//! over an XDG file hierarchy with `ENTRSPHERE_*` environment overrides, and
//! failures render as miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use entrsphere_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("high-cost model: {}", config.tiering.high_cost_model);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::EntrsphereConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `EntrsphereConfig` or every diagnostic collected
/// along the way (deserialization errors or validation errors).
pub fn load_and_validate() -> Result<EntrsphereConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = collect_toml_sources(&loader::search_paths());
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(
    path: &std::path::Path,
) -> Result<EntrsphereConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = collect_toml_sources(&[path.to_path_buf()]);
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<EntrsphereConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read whichever of `paths` exist, for diagnostic span resolution.
fn collect_toml_sources(paths: &[std::path::PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(path).ok()?;
            let display = std::fs::canonicalize(path)
                .unwrap_or_else(|_| path.clone())
                .display()
                .to_string();
            Some((display, content))
        })
        .collect()
}
