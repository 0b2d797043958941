// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process session store backed by a `RwLock<HashMap>`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::EntrsphereError;
use crate::traits::{SessionMutation, SessionStore};
use crate::types::SessionId;

/// Session store that keeps everything in memory.
///
/// Used by the CLI and by tests. Sessions are lost when the process exits.
pub struct InMemorySessionStore<S> {
    sessions: RwLock<HashMap<SessionId, S>>,
}

impl<S> InMemorySessionStore<S> {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl<S> Default for InMemorySessionStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> SessionStore<S> for InMemorySessionStore<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn save(&self, id: &SessionId, session: S) -> Result<(), EntrsphereError> {
        self.sessions.write().await.insert(id.clone(), session);
        debug!(session_id = %id, "session saved");
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<Option<S>, EntrsphereError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &SessionId,
        mutation: SessionMutation<S>,
    ) -> Result<S, EntrsphereError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| EntrsphereError::SessionNotFound { id: id.clone() })?;
        mutation(session);
        Ok(session.clone())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), EntrsphereError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionId>, EntrsphereError> {
        let mut ids: Vec<SessionId> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
