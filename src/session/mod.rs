//! Session storage behind the auth endpoints
//!
//! Sessions are opaque random tokens mapped to a user id with an expiry.
//! The store trait keeps the auth handlers agnostic of where sessions live;
//! the in-memory implementation covers development and tests, and a
//! Redis-backed implementation would slot in behind the same trait for
//! production.

use crate::core::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// An active session
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque token carried by the client's cookie
    pub token: Uuid,

    /// The authenticated user
    pub user_id: Uuid,

    /// When this session stops being valid
    pub expires_at: DateTime<Utc>,
}

/// Store contract for sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a new session for a user
    async fn create(&self, user_id: Uuid) -> Result<Session, StorageError>;

    /// Look up a live session; expired or unknown tokens resolve to `None`
    async fn get(&self, token: &Uuid) -> Result<Option<Session>, StorageError>;

    /// Destroy a session; destroying an unknown token is a no-op
    async fn destroy(&self, token: &Uuid) -> Result<(), StorageError>;
}

/// In-memory session store.
///
/// Expired sessions are dropped on lookup of their own token and swept
/// wholesale on every `create`, so abandoned tokens do not accumulate.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    max_age: Duration,
}

impl InMemorySessionStore {
    /// Create a store whose sessions live for `max_age_secs` seconds
    pub fn new(max_age_secs: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_age: Duration::seconds(max_age_secs),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user_id: Uuid) -> Result<Session, StorageError> {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            user_id,
            expires_at: now + self.max_age,
        };

        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| StorageError::in_memory(format!("failed to acquire write lock: {}", e)))?;

        sessions.retain(|_, existing| existing.expires_at > now);
        sessions.insert(session.token, session.clone());
        Ok(session)
    }

    async fn get(&self, token: &Uuid) -> Result<Option<Session>, StorageError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| StorageError::in_memory(format!("failed to acquire write lock: {}", e)))?;

        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Ok(Some(session.clone())),
            Some(_) => {
                sessions.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn destroy(&self, token: &Uuid) -> Result<(), StorageError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| StorageError::in_memory(format!("failed to acquire write lock: {}", e)))?;

        sessions.remove(token);
        Ok(())
    }
}
