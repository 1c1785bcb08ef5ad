use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{InvitationError, InvitationId, InvitationReply};
use super::repository::InvitationRepository;
use super::service::InvitationService;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::service::PropertyError;

/// Router builder exposing invitation intake and responses.
pub fn invitation_router<R>(service: Arc<InvitationService<R>>) -> Router
where
    R: InvitationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/invitations",
            post(invite_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/invitations/:invitation_id/response",
            post(respond_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: InvitationError) -> Response {
    let status = match &error {
        InvitationError::NotFound | InvitationError::Property(PropertyError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        InvitationError::Property(PropertyError::AccessDenied) => StatusCode::FORBIDDEN,
        InvitationError::AlreadyResolved { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct InviteRequest {
    property_id: String,
    landlord_id: String,
    renter_email: String,
}

pub(crate) async fn invite_handler<R>(
    State(service): State<Arc<InvitationService<R>>>,
    axum::Json(request): axum::Json<InviteRequest>,
) -> Response
where
    R: InvitationRepository + 'static,
{
    match service.invite(
        &PropertyId(request.property_id),
        &request.landlord_id,
        &request.renter_email,
        Utc::now(),
    ) {
        Ok(invitation) => (StatusCode::CREATED, axum::Json(invitation)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RespondRequest {
    reply: InvitationReply,
}

pub(crate) async fn respond_handler<R>(
    State(service): State<Arc<InvitationService<R>>>,
    Path(invitation_id): Path<String>,
    axum::Json(request): axum::Json<RespondRequest>,
) -> Response
where
    R: InvitationRepository + 'static,
{
    match service.respond(&InvitationId(invitation_id), request.reply, Utc::now()) {
        Ok(invitation) => (StatusCode::OK, axum::Json(invitation)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    landlord_id: String,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<InvitationService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: InvitationRepository + 'static,
{
    match service.list_for_landlord(&query.landlord_id) {
        Ok(invitations) => (StatusCode::OK, axum::Json(invitations)).into_response(),
        Err(error) => error_response(error),
    }
}
