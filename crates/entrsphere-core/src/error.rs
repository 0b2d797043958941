// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the EntrSphere discovery router.
//!
//! The routing and tiering functions are total and never produce these.
//! Errors only surface from the surrounding plumbing: configuration,
//! catalog loading, and session persistence.

use thiserror::Error;

use crate::types::SessionId;

/// The primary error type used across the EntrSphere workspace.
#[derive(Debug, Error)]
pub enum EntrsphereError {
    /// Configuration errors (invalid TOML, bad thresholds, unreadable catalog).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session store errors (backend failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A session id was referenced that the store does not hold.
    #[error("session not found: {id}")]
    SessionNotFound { id: SessionId },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for EntrsphereError {
    fn from(err: serde_json::Error) -> Self {
        EntrsphereError::Storage {
            source: Box::new(err),
        }
    }
}
