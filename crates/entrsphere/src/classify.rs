// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `entrsphere classify` command implementation.
//!
//! Replays a set of answers through a fresh session and prints the resolved
//! route. Answers the catalog does not recognize are reported, not fatal.

use entrsphere_config::EntrsphereConfig;
use entrsphere_core::EntrsphereError;
use entrsphere_router::{
    AnswerOutcome, DiscoveryEngine, IgnoreReason, Route, SessionPhase, SignalVector,
};
use serde::Serialize;

/// JSON output of `entrsphere classify`.
#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub session_id: String,
    pub route: Route,
    pub label: &'static str,
    pub signals: SignalVector,
    pub ignored: Vec<IgnoredAnswer>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IgnoredAnswer {
    pub question_id: String,
    pub option_id: String,
    pub reason: IgnoreReason,
}

/// Run every answer through `engine` and resolve the route.
pub fn classify_answers(engine: &DiscoveryEngine, answers: &[(String, String)]) -> ClassifyReport {
    let mut session = engine.start_session();
    engine.advance_question(&mut session);

    let mut ignored = Vec::new();
    for (question_id, option_id) in answers {
        if let AnswerOutcome::Ignored(reason) =
            engine.record_answer(&mut session, question_id, option_id)
        {
            ignored.push(IgnoredAnswer {
                question_id: question_id.clone(),
                option_id: option_id.clone(),
                reason,
            });
        }
    }

    while engine.advance_question(&mut session) != SessionPhase::RouteResolved {}

    // Advancing past the last question always resolves a route.
    let route = session.route().unwrap_or(engine.classifier().fallback());
    ClassifyReport {
        session_id: session.id().to_string(),
        route,
        label: route.label(),
        signals: *session.signals(),
        ignored,
    }
}

pub fn run_classify(
    config: &EntrsphereConfig,
    answers: &[(String, String)],
) -> Result<(), EntrsphereError> {
    let engine = DiscoveryEngine::from_config(&config.routing)?;
    let report = classify_answers(&engine, answers);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(q, o)| (q.to_string(), o.to_string()))
            .collect()
    }

    #[test]
    fn classifies_partial_answer_set() {
        let engine = DiscoveryEngine::default();
        let report = classify_answers(
            &engine,
            &pairs(&[("integration", "deeply_connected"), ("decision", "outside_approval")]),
        );
        assert_eq!(report.route, Route::D);
        assert_eq!(report.label, "Integration mapping");
        assert!(report.ignored.is_empty());
    }

    #[test]
    fn no_answers_falls_back_to_a() {
        let report = classify_answers(&DiscoveryEngine::default(), &[]);
        assert_eq!(report.route, Route::A);
        assert!(report.signals.is_empty());
    }

    #[test]
    fn reports_ignored_answers() {
        let report = classify_answers(
            &DiscoveryEngine::default(),
            &pairs(&[
                ("situation", "complicated"),
                ("situation", "clear_goal"),
                ("budget", "large"),
            ]),
        );
        assert_eq!(
            report.ignored,
            vec![
                IgnoredAnswer {
                    question_id: "situation".into(),
                    option_id: "clear_goal".into(),
                    reason: IgnoreReason::AlreadyAnswered,
                },
                IgnoredAnswer {
                    question_id: "budget".into(),
                    option_id: "large".into(),
                    reason: IgnoreReason::UnknownQuestion,
                },
            ]
        );
        assert_eq!(report.route, Route::A);
    }
}
