// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions consumed by the routing engine's callers.

pub mod storage;

pub use storage::{SessionMutation, SessionStore};
