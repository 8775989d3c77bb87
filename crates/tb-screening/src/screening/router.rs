use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::catalog::SymptomId;
use super::domain::{AnswerValue, BasicInfoUpdate, SymptomUpdate, UploadError};
use super::flow::QuestionStep;
use super::service::{ScreeningService, ServiceError, UploadRequest};
use super::session::{ScreeningSession, Transition};
use super::store::{SessionId, SessionStore, StoreError};

/// Compact state echo returned by every mutating endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub current_step: usize,
    pub total_steps: usize,
    pub completed: bool,
}

impl SessionView {
    fn of(id: &SessionId, session: &ScreeningSession) -> Self {
        Self {
            session_id: id.clone(),
            current_step: session.current_step,
            total_steps: session.total_steps,
            completed: session.completed,
        }
    }
}

/// Full snapshot plus the planned deep-question steps, for wizard rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub question_steps: Vec<QuestionStep>,
    pub session: ScreeningSession,
}

#[derive(Debug, serde::Deserialize)]
pub struct DeepAnswerRequest {
    pub symptom: SymptomId,
    pub question: String,
    pub value: AnswerValue,
}

/// Router builder exposing the screening wizard endpoints.
pub fn screening_router<S>(service: Arc<ScreeningService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/screenings", post(create_handler::<S>))
        .route("/api/v1/screenings/:session_id", get(snapshot_handler::<S>))
        .route(
            "/api/v1/screenings/:session_id/basic-info",
            post(basic_info_handler::<S>),
        )
        .route(
            "/api/v1/screenings/:session_id/symptoms",
            post(symptoms_handler::<S>),
        )
        .route(
            "/api/v1/screenings/:session_id/answers",
            post(answer_handler::<S>),
        )
        .route(
            "/api/v1/screenings/:session_id/uploads",
            post(upload_handler::<S>),
        )
        .route(
            "/api/v1/screenings/:session_id/uploads/:index",
            delete(remove_upload_handler::<S>),
        )
        .route(
            "/api/v1/screenings/:session_id/advance",
            post(advance_handler::<S>),
        )
        .route(
            "/api/v1/screenings/:session_id/retreat",
            post(retreat_handler::<S>),
        )
        .route(
            "/api/v1/screenings/:session_id/submit",
            post(submit_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.create(Utc::now()) {
        Ok(record) => {
            let view = SessionView::of(&record.id, &record.session);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    match service.fetch(&id) {
        Ok(record) => {
            let question_steps = service
                .workflow()
                .plan(&record.session)
                .steps()
                .to_vec();
            let snapshot = SessionSnapshot {
                session_id: record.id,
                question_steps,
                session: record.session,
            };
            (StatusCode::OK, axum::Json(snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn basic_info_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<BasicInfoUpdate>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    respond(
        &id,
        service.apply(&id, Transition::SetBasicInfo { update }, Utc::now()),
    )
}

pub(crate) async fn symptoms_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<SymptomUpdate>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    respond(
        &id,
        service.apply(&id, Transition::SetSymptoms { update }, Utc::now()),
    )
}

pub(crate) async fn answer_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<DeepAnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let transition = Transition::SetDeepAnswer {
        symptom: request.symptom,
        question: request.question,
        value: request.value,
    };
    respond(&id, service.apply(&id, transition, Utc::now()))
}

pub(crate) async fn upload_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<UploadRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    respond(&id, service.add_upload(&id, request, Utc::now()))
}

pub(crate) async fn remove_upload_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path((session_id, index)): Path<(String, usize)>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    respond(&id, service.remove_upload(&id, index, Utc::now()))
}

pub(crate) async fn advance_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    respond(&id, service.advance(&id, Utc::now()))
}

pub(crate) async fn retreat_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    respond(&id, service.retreat(&id, Utc::now()))
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    match service.submit(&id, Utc::now()) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

fn respond(id: &SessionId, outcome: Result<ScreeningSession, ServiceError>) -> Response {
    match outcome {
        Ok(session) => {
            let view = SessionView::of(id, &session);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// Errors are scoped to the step the user is on: validation and upload
/// failures report a client status and never touch the stored state.
fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        ServiceError::Upload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = match &err {
        ServiceError::Validation(validation) => json!({
            "error": validation.to_string(),
            "field": validation.field(),
        }),
        other => json!({ "error": other.to_string() }),
    };

    (status, axum::Json(body)).into_response()
}
