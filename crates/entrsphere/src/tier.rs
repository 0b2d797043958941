// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `entrsphere tier` command implementation.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use entrsphere_config::EntrsphereConfig;
use entrsphere_core::{ChatMessage, EntrsphereError};
use entrsphere_router::{
    Category, ContextAnalyzer, ConversationContext, SignalVector, TierDecision, TierSelector,
};
use serde::Serialize;

/// JSON output of `entrsphere tier`.
#[derive(Debug, Serialize)]
pub struct TierReport {
    pub decision: TierDecision,
    pub context: ConversationContext,
}

/// Build a signal vector from `CATEGORY=weight` pairs.
pub fn parse_signals(pairs: &[(String, String)]) -> Result<SignalVector, EntrsphereError> {
    let mut signals = SignalVector::new();
    for (key, value) in pairs {
        let category = Category::from_str(&key.to_uppercase()).map_err(|_| {
            EntrsphereError::Config(format!("unknown signal category `{key}` (expected A, B, C or D)"))
        })?;
        let weight: f64 = value.parse().map_err(|_| {
            EntrsphereError::Config(format!("signal weight for {category} must be a number, got `{value}`"))
        })?;
        if !signals.add(category, weight) {
            return Err(EntrsphereError::Config(format!(
                "signal weight for {category} must be non-negative, got {value}"
            )));
        }
    }
    Ok(signals)
}

fn read_transcript(path: &Path) -> Result<Vec<ChatMessage>, EntrsphereError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| EntrsphereError::Storage { source: Box::new(e) })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| EntrsphereError::Storage { source: Box::new(e) })?
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn tier_report(
    config: &EntrsphereConfig,
    history: &[ChatMessage],
    signals: &SignalVector,
) -> TierReport {
    let context = ContextAnalyzer::from_config(&config.tiering).analyze(history, signals);
    let decision = TierSelector::new(config.tiering.clone()).select(&context);
    TierReport { decision, context }
}

pub fn run_tier(
    config: &EntrsphereConfig,
    transcript: &Path,
    signal_pairs: &[(String, String)],
) -> Result<(), EntrsphereError> {
    let signals = parse_signals(signal_pairs)?;
    let history = read_transcript(transcript)?;
    let report = tier_report(config, &history, &signals);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrsphere_router::{ConversationPhase, ModelTier};

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn parses_signal_pairs() {
        let signals = parse_signals(&[pair("c", "2"), pair("A", "0.5"), pair("C", "1")]).unwrap();
        assert_eq!(signals, SignalVector::from_weights(0.5, 0.0, 3.0, 0.0));
    }

    #[test]
    fn rejects_bad_signal_pairs() {
        assert!(parse_signals(&[pair("E", "1")]).is_err());
        assert!(parse_signals(&[pair("A", "lots")]).is_err());
        assert!(parse_signals(&[pair("A", "-1")]).is_err());
    }

    #[test]
    fn report_combines_context_and_decision() {
        let history = vec![
            ChatMessage::user("We need sign-off from the committee."),
            ChatMessage::assistant("Understood."),
        ];
        let report = tier_report(&EntrsphereConfig::default(), &history, &SignalVector::new());
        assert!(report.context.political_complexity);
        assert_eq!(report.context.phase, ConversationPhase::Interview);
        assert_eq!(report.decision.tier, ModelTier::HighCost);
    }

    #[test]
    fn reads_transcript_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");
        std::fs::write(
            &path,
            r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]"#,
        )
        .unwrap();
        let history = read_transcript(&path).unwrap();
        assert_eq!(history, vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")]);
    }

    #[test]
    fn malformed_transcript_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"role":"system","content":"x"}]"#).unwrap();
        assert!(read_transcript(&path).is_err());
    }
}
