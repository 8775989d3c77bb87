use serde::{Deserialize, Serialize};

use super::session::ScreeningSession;

/// Identifier wrapper for stored screening sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// A session snapshot as offered to the persistence collaborator. The
/// snapshot shape is exactly the session data model; no extra framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub session: ScreeningSession,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Implementations are offered the full snapshot after every transition and
/// may hand one back at startup via the load-snapshot transition.
pub trait SessionStore: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError>;
    fn update(&self, record: SessionRecord) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
