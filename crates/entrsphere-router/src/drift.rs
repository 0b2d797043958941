// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostics for answers the engine ignores.
//!
//! Unknown or out-of-order answers never fail an interview. They are dropped,
//! and a [`DriftObserver`] is told about it so client/server skew is visible
//! without changing the outcome.

use entrsphere_core::SessionId;
use serde::Serialize;
use strum::Display;
use tracing::warn;

/// Why an answer was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IgnoreReason {
    /// The question id is not in the catalog.
    UnknownQuestion,
    /// The option id is not an option of the question.
    UnknownOption,
    /// The question already has an answer; answers are append-only.
    AlreadyAnswered,
    /// The session has resolved its route and accepts no more answers.
    SessionResolved,
}

/// Receives a callback for every ignored answer.
pub trait DriftObserver: Send + Sync {
    fn answer_ignored(
        &self,
        session_id: &SessionId,
        question_id: &str,
        option_id: &str,
        reason: IgnoreReason,
    );
}

/// Default observer: one structured warning per ignored answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDriftObserver;

impl DriftObserver for TracingDriftObserver {
    fn answer_ignored(
        &self,
        session_id: &SessionId,
        question_id: &str,
        option_id: &str,
        reason: IgnoreReason,
    ) {
        warn!(
            session_id = %session_id,
            question_id,
            option_id,
            %reason,
            "ignoring interview answer"
        );
    }
}
