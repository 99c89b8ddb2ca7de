//! In-memory registry of active sessions.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_util::future::join_all;
use log::info;

use super::{Session, SessionId};
use crate::error::{Error, Result};

/// Lookup table from [`SessionId`] to live [`Session`].
///
/// A session is present here exactly while its transport is open. Removal
/// unlinks the entry under the write lock and only then closes the
/// transport, so a concurrent lookup sees either the whole session or
/// nothing. No lock is ever held across an await point.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-mutated
    // (every mutation is a single HashMap call), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Arc<Session>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Arc<Session>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a session under its own identifier.
    ///
    /// On error the caller still owns the session and is responsible for
    /// closing it.
    pub fn register(&self, session: Arc<Session>) -> Result<()> {
        let id = session.id();
        let mut sessions = self.write();
        if sessions.contains_key(&id) {
            return Err(Error::DuplicateSession { id: id.to_string() });
        }
        sessions.insert(id, session);
        Ok(())
    }

    /// Get a session by identifier.
    pub fn lookup(&self, id: &SessionId) -> Result<Arc<Session>> {
        self.read().get(id).cloned().ok_or_else(|| Error::not_found(id))
    }

    /// Unlink a session and close its transport.
    pub async fn remove(&self, id: &SessionId) -> Result<()> {
        let session = self.write().remove(id).ok_or_else(|| Error::not_found(id))?;
        session.close().await;
        Ok(())
    }

    /// Check if a session is registered.
    pub fn contains(&self, id: &SessionId) -> bool {
        self.read().contains_key(id)
    }

    /// All registered sessions, in no particular order.
    pub fn sessions(&self) -> Vec<Arc<Session>> {
        self.read().values().cloned().collect()
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if no session is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drain the registry and close every session. Used at shutdown.
    pub async fn close_all(&self) {
        let drained: Vec<Arc<Session>> = self.write().drain().map(|(_, s)| s).collect();
        if drained.is_empty() {
            return;
        }
        info!("Closing {} connection(s)", drained.len());
        join_all(drained.iter().map(|session| session.close())).await;
    }
}
