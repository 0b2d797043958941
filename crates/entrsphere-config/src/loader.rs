// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/entrsphere/entrsphere.toml`
//! 3. `~/.config/entrsphere/entrsphere.toml`
//! 4. `./entrsphere.toml`
//! 5. `ENTRSPHERE_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EntrsphereConfig;

const SYSTEM_CONFIG: &str = "/etc/entrsphere/entrsphere.toml";
const LOCAL_CONFIG: &str = "entrsphere.toml";

/// Config file locations in merge order, lowest precedence first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("entrsphere").join(LOCAL_CONFIG));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

/// Build the full Figment (defaults, file hierarchy, env) without extracting.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(EntrsphereConfig::default()));
    for path in search_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<EntrsphereConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<EntrsphereConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EntrsphereConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EntrsphereConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EntrsphereConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `ENTRSPHERE_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `ENTRSPHERE_TIERING_HIGH_COST_MODEL` maps to `tiering.high_cost_model`.
fn env_provider() -> Env {
    Env::prefixed("ENTRSPHERE_").map(|key| {
        // Keys arrive in their original case with the prefix stripped.
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = ["discovery", "routing", "tiering"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_paths_end_with_local_file() {
        let paths = search_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from(SYSTEM_CONFIG)));
        assert_eq!(paths.last(), Some(&PathBuf::from(LOCAL_CONFIG)));
    }

    #[test]
    fn env_overrides_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ENTRSPHERE_TIERING_HIGH_COST_MODEL", "big-model");
            jail.set_env("ENTRSPHERE_ROUTING_C_THRESHOLD", "3");
            let config = load_config().expect("env overrides should load");
            assert_eq!(config.tiering.high_cost_model, "big-model");
            assert_eq!(config.routing.c_threshold, 3.0);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "entrsphere.toml",
                r#"
[tiering]
low_cost_max_tokens = 512
"#,
            )?;
            let config = load_config().expect("local file should load");
            assert_eq!(config.tiering.low_cost_max_tokens, 512);
            Ok(())
        });
    }
}
