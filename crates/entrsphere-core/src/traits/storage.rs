// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait for persistence backends.

use async_trait::async_trait;

use crate::error::EntrsphereError;
use crate::types::SessionId;

/// A mutation applied to a stored session while the store holds its write lock.
pub type SessionMutation<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Opaque persistence for interview sessions.
///
/// The routing core assumes single-writer access to any one session. Stores
/// provide that guarantee through [`SessionStore::update`], which applies the
/// mutation while no other writer can observe or modify the same session.
#[async_trait]
pub trait SessionStore<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Inserts or replaces the session stored under `id`.
    async fn save(&self, id: &SessionId, session: S) -> Result<(), EntrsphereError>;

    /// Returns a snapshot of the session, or `None` if it does not exist.
    async fn load(&self, id: &SessionId) -> Result<Option<S>, EntrsphereError>;

    /// Applies `mutation` to the stored session and returns the updated snapshot.
    ///
    /// Fails with [`EntrsphereError::SessionNotFound`] if `id` is unknown.
    async fn update(
        &self,
        id: &SessionId,
        mutation: SessionMutation<S>,
    ) -> Result<S, EntrsphereError>;

    /// Removes a session. Removing an unknown id is not an error.
    async fn remove(&self, id: &SessionId) -> Result<(), EntrsphereError>;

    /// Lists the ids of all stored sessions.
    async fn list(&self) -> Result<Vec<SessionId>, EntrsphereError>;
}
