//! Adaptive TB screening core: the symptom and follow-up catalogs, the flow
//! planner that turns a symptom selection into wizard steps, the navigation
//! controller, the deterministic scoring engine, and the session transition
//! layer that ties them together.

pub mod catalog;
pub mod domain;
pub mod flow;
pub mod nav;
pub mod questions;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

pub use catalog::{ExposureLevel, RiskFactor, SymptomId};
pub use domain::{
    base64_decoded_len, AnswerValue, BasicInfo, BasicInfoUpdate, DeepAnswers, SymptomSet,
    SymptomUpdate, UploadError, UploadKind, UploadRecord, ValidationError, AGE_MAX, AGE_MIN,
    MAX_UPLOAD_BYTES,
};
pub use flow::{FlowPlan, QuestionStep, STEP_BASIC_INFO, STEP_SYMPTOMS};
pub use questions::{
    QuestionCatalog, QuestionOption, QuestionTemplate, DURATION_LONGEST, QUESTION_DURATION,
    QUESTION_EXPOSURE, QUESTION_PREVIOUS_CONDITIONS,
};
pub use router::{screening_router, SessionSnapshot, SessionView};
pub use scoring::{RiskLevel, ScoreReason, ScoringConfig, ScoringEngine, ScoringResult, Urgency};
pub use service::{ScreeningService, ServiceError, UploadRequest};
pub use session::{ScreeningSession, ScreeningWorkflow, Transition};
pub use store::{SessionId, SessionRecord, SessionStore, StoreError};
