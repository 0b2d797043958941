// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the EntrSphere discovery router.
//!
//! This crate provides the shared types, error type, and persistence trait
//! used by the routing engine and the CLI. The decision logic itself lives
//! in `entrsphere-router`; everything here is plumbing it is consumed through.

pub mod error;
pub mod store;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EntrsphereError;
pub use store::InMemorySessionStore;
pub use traits::SessionStore;
pub use types::{ChatMessage, ChatRole, SessionId};
