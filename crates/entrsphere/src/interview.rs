// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `entrsphere interview` command implementation.
//!
//! Walks the question catalog in a readline prompt, one question at a time,
//! keeping the session in a [`SessionStore`]. Once the route resolves, the
//! tier for the routing turn is selected and printed alongside it.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use entrsphere_config::EntrsphereConfig;
use entrsphere_core::{ChatMessage, EntrsphereError, InMemorySessionStore, SessionStore};
use entrsphere_router::{
    ContextAnalyzer, DiscoveryEngine, InterviewSession, Question, TierDecision, TierSelector,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::Serialize;
use tracing::info;

/// JSON written by `--output`.
#[derive(Debug, Serialize)]
struct InterviewRecord<'a> {
    session: &'a InterviewSession,
    tier: &'a TierDecision,
}

/// Map user input to an option id: a 1-based option number or the id itself.
pub fn parse_choice<'q>(input: &str, question: &'q Question) -> Option<&'q str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| question.options.get(i))
            .map(|o| o.id.as_str());
    }
    question
        .options
        .iter()
        .find(|o| o.id.eq_ignore_ascii_case(input))
        .map(|o| o.id.as_str())
}

/// Transcript that stands in for the conversation up to route detection.
pub fn routing_transcript(engine: &DiscoveryEngine, session: &InterviewSession) -> Vec<ChatMessage> {
    let mut history = Vec::with_capacity(session.answers().len() * 2 + 1);
    for question in engine.catalog().iter() {
        let Some(option) = session
            .answers()
            .get(&question.id)
            .and_then(|option_id| question.option(option_id))
        else {
            continue;
        };
        history.push(ChatMessage::assistant(question.prompt.clone()));
        history.push(ChatMessage::user(option.label.clone()));
    }
    if let Some(route) = session.route() {
        history.push(ChatMessage::assistant(format!(
            "Route detected: {route} ({})",
            route.label()
        )));
    }
    history
}

fn print_question(index: usize, total: usize, question: &Question) {
    println!(
        "\n{} {}",
        format!("[{}/{}]", index + 1, total).dimmed(),
        question.prompt.bold()
    );
    if let Some(subtext) = &question.subtext {
        println!("      {}", subtext.dimmed());
    }
    for (i, option) in question.options.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).cyan(), option.label);
    }
}

/// Runs the `entrsphere interview` interactive prompt.
pub async fn run_interview(
    config: &EntrsphereConfig,
    output: Option<PathBuf>,
) -> Result<(), EntrsphereError> {
    let engine = DiscoveryEngine::from_config(&config.routing)?;
    let store: Arc<dyn SessionStore<InterviewSession>> = Arc::new(InMemorySessionStore::new());

    let session = engine.start_session();
    let session_id = session.id().clone();
    store.save(&session_id, session).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| EntrsphereError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", config.discovery.name.bold().green());
    println!("Answer with an option number or id. Type {} to exit.", "quit".yellow());

    let total = engine.catalog().len();
    let advancer = engine.clone();
    let mut session = store
        .update(
            &session_id,
            Box::new(move |s: &mut InterviewSession| {
                advancer.advance_question(s);
            }),
        )
        .await?;

    while let Some(question) = engine.current_question(&session).cloned() {
        print_question(usize::try_from(session.current_index()).unwrap_or(0), total, &question);

        let option_id = loop {
            match rl.readline(&format!("{}> ", question.id.green())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == "quit" || trimmed == "exit" {
                        info!(session_id = %session_id, "interview abandoned");
                        return Ok(());
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);
                    match parse_choice(trimmed, &question) {
                        Some(id) => break id.to_string(),
                        None => eprintln!("{}: not an option for this question", "error".red()),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
                Err(e) => {
                    return Err(EntrsphereError::Internal(format!("readline failed: {e}")));
                }
            }
        };

        let step = engine.clone();
        let question_id = question.id.clone();
        session = store
            .update(
                &session_id,
                Box::new(move |s: &mut InterviewSession| {
                    step.record_answer(s, &question_id, &option_id);
                    step.advance_question(s);
                }),
            )
            .await?;
    }

    let Some(route) = session.route() else {
        return Err(EntrsphereError::Internal(
            "interview ended without a route".to_string(),
        ));
    };

    let history = routing_transcript(&engine, &session);
    let context = ContextAnalyzer::from_config(&config.tiering).analyze(&history, session.signals());
    let decision = TierSelector::new(config.tiering.clone()).select(&context);

    println!();
    println!("{} {} ({})", "route:".bold(), route.to_string().green().bold(), route.label());
    println!("{} {}", "signals:".bold(), session.signals());
    println!(
        "{} {} [{}] {}",
        "tier:".bold(),
        decision.tier,
        decision.model,
        format!("({})", decision.reason).dimmed()
    );

    if let Some(path) = output {
        let record = InterviewRecord {
            session: &session,
            tier: &decision,
        };
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(&path, json).map_err(|e| EntrsphereError::Storage { source: Box::new(e) })?;
        println!("{}", format!("session written to {}", path.display()).dimmed());
    }

    store.remove(&session_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrsphere_router::{ConversationPhase, ModelTier, QuestionCatalog, Route};

    fn situation() -> Question {
        QuestionCatalog::default()
            .question("situation")
            .cloned()
            .unwrap()
    }

    #[test]
    fn parse_choice_by_number() {
        let q = situation();
        assert_eq!(parse_choice("1", &q), Some("clear_goal"));
        assert_eq!(parse_choice(" 3 ", &q), Some("complicated"));
        assert_eq!(parse_choice("0", &q), None);
        assert_eq!(parse_choice("9", &q), None);
    }

    #[test]
    fn parse_choice_by_id() {
        let q = situation();
        assert_eq!(parse_choice("exploring", &q), Some("exploring"));
        assert_eq!(parse_choice("Connect_Systems", &q), Some("connect_systems"));
        assert_eq!(parse_choice("maybe", &q), None);
    }

    #[test]
    fn transcript_ends_with_route_marker() {
        let engine = DiscoveryEngine::default();
        let mut session = engine.start_session();
        engine.advance_question(&mut session);
        engine.record_answer(&mut session, "situation", "clear_goal");
        engine.record_answer(&mut session, "requirements", "know_exactly");
        while !session.is_resolved() {
            engine.advance_question(&mut session);
        }
        assert_eq!(session.route(), Some(Route::A));

        let history = routing_transcript(&engine, &session);
        assert_eq!(history.len(), 5);
        assert!(history[4].content.starts_with("Route detected: A"));

        let context = ContextAnalyzer::default().analyze(&history, session.signals());
        assert_eq!(context.phase, ConversationPhase::Routing);
        let decision = TierSelector::default().select(&context);
        assert_eq!(decision.tier, ModelTier::LowCost);
        assert!(!decision.forced);
    }
}
