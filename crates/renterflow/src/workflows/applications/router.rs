use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationDecision, ApplicationError, ApplicationId, NewApplication};
use super::repository::ApplicationRepository;
use super::service::ApplicationService;
use crate::workflows::properties::service::PropertyError;

/// Router builder exposing application intake, search, and decisions.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_handler::<R>).get(search_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/decision",
            post(decision_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: ApplicationError) -> Response {
    let status = match &error {
        ApplicationError::NotFound | ApplicationError::Property(PropertyError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ApplicationError::Property(PropertyError::AccessDenied) => StatusCode::FORBIDDEN,
        ApplicationError::InvalidTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    axum::Json(intake): axum::Json<NewApplication>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.submit(intake, Utc::now()) {
        Ok(application) => (StatusCode::ACCEPTED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    landlord_id: String,
    #[serde(default)]
    q: String,
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.search(&query.landlord_id, &query.q) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    landlord_id: String,
    decision: ApplicationDecision,
}

pub(crate) async fn decision_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.decide(
        &ApplicationId(application_id),
        &request.landlord_id,
        request.decision,
        Utc::now(),
    ) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}
