use crate::infra::AppState;
use crate::referrals::{plain_explanation, recommended, ReferralView};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tb_screening::screening::{
    screening_router, ScreeningService, ServiceError, SessionId, SessionStore, StoreError, Urgency,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ReferralQuery {
    pub(crate) lat: Option<f64>,
    pub(crate) lng: Option<f64>,
    #[serde(default = "default_radius_km")]
    pub(crate) radius_km: f64,
    #[serde(default = "default_max_results")]
    pub(crate) max_results: usize,
    #[serde(default)]
    pub(crate) urgency: Option<Urgency>,
}

fn default_radius_km() -> f64 {
    50.0
}

fn default_max_results() -> usize {
    5
}

/// Result payload for the report endpoint: the core assessment enriched with
/// referrals and a plain-language narrative.
#[derive(Debug, Serialize)]
pub(crate) struct ScreeningReport {
    pub(crate) session_id: SessionId,
    pub(crate) risk_score: u8,
    pub(crate) likelihood: &'static str,
    pub(crate) urgency: &'static str,
    pub(crate) reasons: Vec<String>,
    pub(crate) recommended_tests: Vec<String>,
    pub(crate) referrals: Vec<ReferralView>,
    pub(crate) explanation_plain: String,
}

pub(crate) fn with_screening_routes<S>(service: Arc<ScreeningService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    screening_router(service.clone())
        .merge(report_router(service))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/referrals", axum::routing::get(referrals_endpoint))
}

fn report_router<S>(service: Arc<ScreeningService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    axum::Router::new()
        .route(
            "/api/v1/screenings/:session_id/report",
            axum::routing::get(report_endpoint::<S>),
        )
        .with_state(service)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn referrals_endpoint(
    Query(query): Query<ReferralQuery>,
) -> Json<Vec<ReferralView>> {
    let location = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };
    Json(recommended(
        location,
        query.radius_km,
        query.max_results,
        query.urgency,
    ))
}

pub(crate) async fn report_endpoint<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    Query(query): Query<ReferralQuery>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let record = match service.fetch(&id) {
        Ok(record) => record,
        Err(ServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({ "error": "screening session not found" });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let Some(result) = record.session.result else {
        let payload = json!({ "error": "screening has not been submitted yet" });
        return (StatusCode::CONFLICT, Json(payload)).into_response();
    };

    let location = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };
    let referrals = recommended(
        location,
        query.radius_km,
        query.max_results,
        Some(result.urgency),
    );
    let cap = service.workflow().engine().config().score_cap;

    let report = ScreeningReport {
        session_id: record.id,
        risk_score: result.score,
        likelihood: result.classification.label(),
        urgency: result.urgency.label(),
        reasons: result.reasons.iter().map(|reason| reason.summary()).collect(),
        recommended_tests: result.recommended_tests.clone(),
        referrals,
        explanation_plain: plain_explanation(&result, cap),
    };

    (StatusCode::OK, Json(report)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{standard_workflow, InMemorySessionStore};
    use chrono::Utc;
    use tb_screening::screening::{SymptomId, SymptomUpdate, Transition};

    fn service() -> Arc<ScreeningService<InMemorySessionStore>> {
        Arc::new(ScreeningService::new(
            Arc::new(InMemorySessionStore::default()),
            standard_workflow(),
        ))
    }

    #[tokio::test]
    async fn referrals_endpoint_returns_directory_head_without_location() {
        let query = ReferralQuery {
            lat: None,
            lng: None,
            radius_km: default_radius_km(),
            max_results: default_max_results(),
            urgency: None,
        };
        let Json(views) = referrals_endpoint(Query(query)).await;
        assert_eq!(views.len(), 5);
        assert!(views.iter().all(|view| view.distance_km.is_none()));
    }

    #[tokio::test]
    async fn report_endpoint_rejects_unsubmitted_sessions() {
        let service = service();
        let record = service.create(Utc::now()).expect("session created");

        let query = ReferralQuery {
            lat: None,
            lng: None,
            radius_km: default_radius_km(),
            max_results: default_max_results(),
            urgency: None,
        };
        let response = report_endpoint(
            State(service),
            Path(record.id.0.clone()),
            Query(query),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn report_endpoint_enriches_a_submitted_session() {
        let service = service();
        let record = service.create(Utc::now()).expect("session created");
        let id = record.id.clone();

        service
            .apply(
                &id,
                Transition::SetBasicInfo {
                    update: tb_screening::screening::BasicInfoUpdate {
                        age: Some(45),
                        ..Default::default()
                    },
                },
                Utc::now(),
            )
            .expect("basic info applied");
        service
            .apply(
                &id,
                Transition::SetSymptoms {
                    update: SymptomUpdate::select(&[
                        SymptomId::CoughGt2Weeks,
                        SymptomId::FeverEvening,
                    ]),
                },
                Utc::now(),
            )
            .expect("symptoms applied");
        service.submit(&id, Utc::now()).expect("submitted");

        let query = ReferralQuery {
            lat: None,
            lng: None,
            radius_km: default_radius_km(),
            max_results: 3,
            urgency: None,
        };
        let response = report_endpoint(State(service), Path(id.0.clone()), Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json payload");
        assert_eq!(body["risk_score"], 5);
        assert_eq!(body["likelihood"], "Moderate");
        assert_eq!(body["referrals"].as_array().expect("referrals").len(), 3);
        assert!(body["explanation_plain"]
            .as_str()
            .expect("explanation")
            .contains("moderate TB risk"));
    }
}
