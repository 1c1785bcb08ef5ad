use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeaseAction, LeaseError, LeaseId};
use super::fill::LeaseTemplate;
use super::repository::LeaseRepository;
use super::service::{LeaseUpload, LeaseWorkflow};
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::service::PropertyError;

/// Router builder exposing the lease document workflow.
pub fn lease_router<R>(workflow: Arc<LeaseWorkflow<R>>) -> Router
where
    R: LeaseRepository + 'static,
{
    Router::new()
        .route("/api/v1/leases", post(send_handler::<R>))
        .route("/api/v1/leases/:lease_id", get(get_handler::<R>))
        .route(
            "/api/v1/leases/:lease_id/submission",
            post(submission_handler::<R>),
        )
        .route(
            "/api/v1/leases/:lease_id/decision",
            post(decision_handler::<R>),
        )
        .with_state(workflow)
}

fn error_response(error: LeaseError) -> Response {
    let status = match &error {
        LeaseError::NotFound | LeaseError::Property(PropertyError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        LeaseError::WrongRenter | LeaseError::Property(PropertyError::AccessDenied) => {
            StatusCode::FORBIDDEN
        }
        LeaseError::InvalidTransition { .. }
        | LeaseError::StageGate { .. }
        | LeaseError::Board(_) => StatusCode::CONFLICT,
        LeaseError::Fill(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendRequest {
    template: LeaseTemplate,
    property_id: String,
    landlord_id: String,
    renter_email: String,
}

pub(crate) async fn send_handler<R>(
    State(workflow): State<Arc<LeaseWorkflow<R>>>,
    axum::Json(request): axum::Json<SendRequest>,
) -> Response
where
    R: LeaseRepository + 'static,
{
    match workflow.send(
        request.template,
        &PropertyId(request.property_id),
        &request.landlord_id,
        &request.renter_email,
        Utc::now(),
    ) {
        Ok(lease) => (StatusCode::CREATED, axum::Json(lease)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionRequest {
    renter_email: String,
    file_name: String,
    content_type: String,
    contents: String,
}

pub(crate) async fn submission_handler<R>(
    State(workflow): State<Arc<LeaseWorkflow<R>>>,
    Path(lease_id): Path<String>,
    axum::Json(request): axum::Json<SubmissionRequest>,
) -> Response
where
    R: LeaseRepository + 'static,
{
    let content_type: mime::Mime = match request.content_type.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            let payload = json!({ "error": "content_type is not a valid mime type" });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    let upload = LeaseUpload {
        file_name: request.file_name,
        content_type,
        bytes: request.contents.into_bytes(),
    };

    match workflow.renter_submit(
        &LeaseId(lease_id),
        &request.renter_email,
        upload,
        Utc::now(),
    ) {
        Ok(lease) => (StatusCode::OK, axum::Json(lease)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    landlord_id: String,
    action: LeaseAction,
}

pub(crate) async fn decision_handler<R>(
    State(workflow): State<Arc<LeaseWorkflow<R>>>,
    Path(lease_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: LeaseRepository + 'static,
{
    match workflow.landlord_decision(
        &LeaseId(lease_id),
        &request.landlord_id,
        request.action,
        Utc::now(),
    ) {
        Ok(lease) => (StatusCode::OK, axum::Json(lease)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(workflow): State<Arc<LeaseWorkflow<R>>>,
    Path(lease_id): Path<String>,
) -> Response
where
    R: LeaseRepository + 'static,
{
    match workflow.get(&LeaseId(lease_id)) {
        Ok(lease) => (StatusCode::OK, axum::Json(lease)).into_response(),
        Err(error) => error_response(error),
    }
}
