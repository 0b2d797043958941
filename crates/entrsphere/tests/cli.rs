// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the non-interactive `entrsphere` subcommands.
//!
//! Every run gets an empty temp working directory, an explicit config file
//! and a cleared environment, so host config and `ENTRSPHERE_*` variables
//! never leak in.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn run(dir: &Path, config: &str, args: &[&str]) -> Output {
    let config_path = dir.join("entrsphere.toml");
    std::fs::write(&config_path, config).unwrap();
    Command::new(env!("CARGO_BIN_EXE_entrsphere"))
        .env_clear()
        .current_dir(dir)
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn questions_lists_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "", &["questions"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["situation", "requirements", "integration", "decision", "candor"] {
        assert!(stdout.contains(id), "missing question {id}");
    }
}

#[test]
fn classify_routes_strategic_answers_to_c() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        "",
        &[
            "classify",
            "--answer",
            "situation=complicated",
            "--answer",
            "requirements=its_complicated",
            "--answer",
            "decision=different_opinions",
        ],
    );
    let report = stdout_json(&output);
    assert_eq!(report["route"], "C");
    assert_eq!(report["signals"]["C"], 3.0);
    assert_eq!(report["ignored"].as_array().unwrap().len(), 0);
}

#[test]
fn classify_honors_configured_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        "[routing]\nc_threshold = 4.0\n",
        &[
            "classify",
            "--answer",
            "situation=complicated",
            "--answer",
            "requirements=its_complicated",
            "--answer",
            "decision=different_opinions",
            "--answer",
            "situation=exploring",
        ],
    );
    let report = stdout_json(&output);
    assert_eq!(report["route"], "A");
    assert_eq!(report["signals"]["C"], 3.0);
    assert_eq!(report["ignored"][0]["reason"], "already_answered");
}

#[test]
fn tier_escalates_spec_generation() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.json");
    std::fs::write(
        &transcript,
        r#"[
            {"role": "user", "content": "I know exactly what I want."},
            {"role": "assistant", "content": "Great, let me generate spec.json for you."}
        ]"#,
    )
    .unwrap();
    let output = run(
        dir.path(),
        "",
        &["tier", "--transcript", transcript.to_str().unwrap(), "--signal", "A=2"],
    );
    let report = stdout_json(&output);
    assert_eq!(report["context"]["phase"], "spec-generation");
    assert_eq!(report["decision"]["tier"], "high-cost");
    assert_eq!(report["decision"]["reason"], "spec generation phase");
}

#[test]
fn tier_respects_force_tier() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.json");
    std::fs::write(
        &transcript,
        r#"[{"role": "user", "content": "We need board approval first."}]"#,
    )
    .unwrap();
    let output = run(
        dir.path(),
        "[tiering]\nforce_tier = \"low-cost\"\n",
        &["tier", "--transcript", transcript.to_str().unwrap()],
    );
    let report = stdout_json(&output);
    assert_eq!(report["context"]["political_complexity"], true);
    assert_eq!(report["decision"]["tier"], "low-cost");
    assert_eq!(report["decision"]["forced"], true);
}

#[test]
fn invalid_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "[tiering]\nconflict_margn = 0.2\n", &["questions"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn bad_signal_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.json");
    std::fs::write(&transcript, "[]").unwrap();
    let output = run(
        dir.path(),
        "",
        &["tier", "--transcript", transcript.to_str().unwrap(), "--signal", "Z=1"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown signal category"));
}

#[test]
fn env_override_reaches_tier_decision() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("entrsphere.toml");
    std::fs::write(&config_path, "").unwrap();
    let transcript = dir.path().join("transcript.json");
    std::fs::write(&transcript, r#"[{"role": "user", "content": "hello"}]"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_entrsphere"))
        .env_clear()
        .env("ENTRSPHERE_TIERING_FORCE_TIER", "high-cost")
        .env("ENTRSPHERE_TIERING_HIGH_COST_MODEL", "big-model")
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["tier", "--transcript", transcript.to_str().unwrap()])
        .output()
        .unwrap();
    let report = stdout_json(&output);
    assert_eq!(report["decision"]["tier"], "high-cost");
    assert_eq!(report["decision"]["model"], "big-model");
    assert_eq!(report["decision"]["forced"], true);
}
