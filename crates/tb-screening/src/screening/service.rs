use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    base64_decoded_len, UploadError, UploadKind, UploadRecord, ValidationError,
};
use super::scoring::ScoringResult;
use super::session::{ScreeningSession, ScreeningWorkflow, Transition};
use super::store::{SessionId, SessionRecord, SessionStore, StoreError};

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("scr-{id:06}"))
}

/// Inbound upload payload, checked at the boundary before a record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub kind: UploadKind,
    pub content_type: String,
    pub content_base64: String,
}

/// Service composing the workflow with a session store. Every mutation is a
/// pure transition followed by a store write; a failed write surfaces as an
/// error and leaves the stored state untouched.
pub struct ScreeningService<S> {
    workflow: Arc<ScreeningWorkflow>,
    store: Arc<S>,
}

impl<S> ScreeningService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, workflow: ScreeningWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
            store,
        }
    }

    pub fn workflow(&self) -> &ScreeningWorkflow {
        &self.workflow
    }

    pub fn create(&self, now: DateTime<Utc>) -> Result<SessionRecord, ServiceError> {
        let record = SessionRecord {
            id: next_session_id(),
            session: ScreeningSession::new(now),
        };
        let stored = self.store.insert(record)?;
        tracing::info!(session = %stored.id.0, "screening session created");
        Ok(stored)
    }

    pub fn fetch(&self, id: &SessionId) -> Result<SessionRecord, ServiceError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    /// Apply one transition and persist the observed new state.
    pub fn apply(
        &self,
        id: &SessionId,
        transition: Transition,
        now: DateTime<Utc>,
    ) -> Result<ScreeningSession, ServiceError> {
        let record = self.fetch(id)?;
        let mut session = self.workflow.apply(record.session, transition);
        session.updated_at = now;
        self.store.update(SessionRecord {
            id: id.clone(),
            session: session.clone(),
        })?;
        Ok(session)
    }

    pub fn advance(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<ScreeningSession, ServiceError> {
        let record = self.fetch(id)?;
        let mut session = self.workflow.advance(record.session)?;
        session.updated_at = now;
        self.store.update(SessionRecord {
            id: id.clone(),
            session: session.clone(),
        })?;
        Ok(session)
    }

    pub fn retreat(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<ScreeningSession, ServiceError> {
        let record = self.fetch(id)?;
        let mut session = self.workflow.retreat(record.session);
        session.updated_at = now;
        self.store.update(SessionRecord {
            id: id.clone(),
            session: session.clone(),
        })?;
        Ok(session)
    }

    /// Accept an upload. The size ceiling and content-type checks happen
    /// here, before the record enters the session; a rejected file leaves
    /// everything else untouched.
    pub fn add_upload(
        &self,
        id: &SessionId,
        request: UploadRequest,
        now: DateTime<Utc>,
    ) -> Result<ScreeningSession, ServiceError> {
        let size = base64_decoded_len(&request.content_base64);
        let record = UploadRecord::new(
            request.filename,
            request.kind,
            request.content_type,
            size,
            request.content_base64,
            now,
        )?;
        self.apply(id, Transition::AddUpload { record }, now)
    }

    pub fn remove_upload(
        &self,
        id: &SessionId,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<ScreeningSession, ServiceError> {
        self.apply(id, Transition::RemoveUpload { index }, now)
    }

    /// Score the completed questionnaire. A missing or out-of-range age is
    /// the one hard validation error and is surfaced before scoring runs.
    pub fn submit(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<ScoringResult, ServiceError> {
        let record = self.fetch(id)?;
        record.session.basic_info.validate()?;

        let session = self.apply(id, Transition::ComputeScore, now)?;
        let result = session
            .result
            .expect("compute-score transition always stores a result");
        tracing::info!(
            session = %id.0,
            score = result.score,
            classification = result.classification.label(),
            urgency = result.urgency.label(),
            "screening submitted"
        );
        Ok(result)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
