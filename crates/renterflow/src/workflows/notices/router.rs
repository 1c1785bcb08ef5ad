use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::NoticeId;
use super::repository::NoticeRepository;
use super::service::{NoticeError, NoticeService};
use crate::workflows::identity::RenterId;

/// Router builder exposing the landlord and renter notice inboxes.
pub fn notice_router<R>(service: Arc<NoticeService<R>>) -> Router
where
    R: NoticeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/notices/landlord/:landlord_id",
            get(landlord_inbox_handler::<R>),
        )
        .route(
            "/api/v1/notices/landlord/:landlord_id/lease",
            get(landlord_lease_inbox_handler::<R>),
        )
        .route(
            "/api/v1/notices/renter/:renter_id",
            get(renter_inbox_handler::<R>),
        )
        .route("/api/v1/notices/:notice_id/read", post(read_handler::<R>))
        .route("/api/v1/notices/:notice_id", delete(delete_handler::<R>))
        .with_state(service)
}

fn error_response(error: NoticeError) -> Response {
    let status = match &error {
        NoticeError::NotFound => StatusCode::NOT_FOUND,
        NoticeError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn landlord_inbox_handler<R>(
    State(service): State<Arc<NoticeService<R>>>,
    Path(landlord_id): Path<String>,
) -> Response
where
    R: NoticeRepository + 'static,
{
    let notices = match service.landlord_inbox(&landlord_id) {
        Ok(notices) => notices,
        Err(error) => return error_response(error),
    };
    let unread = notices.iter().filter(|notice| notice.is_unread()).count();
    let payload = json!({ "notices": notices, "unread": unread });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn landlord_lease_inbox_handler<R>(
    State(service): State<Arc<NoticeService<R>>>,
    Path(landlord_id): Path<String>,
) -> Response
where
    R: NoticeRepository + 'static,
{
    let notices = match service.landlord_lease_inbox(&landlord_id) {
        Ok(notices) => notices,
        Err(error) => return error_response(error),
    };
    let unread = notices.iter().filter(|notice| notice.is_unread()).count();
    let payload = json!({ "notices": notices, "unread": unread });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn renter_inbox_handler<R>(
    State(service): State<Arc<NoticeService<R>>>,
    Path(renter_id): Path<String>,
) -> Response
where
    R: NoticeRepository + 'static,
{
    let notices = match service.renter_inbox(&RenterId(renter_id)) {
        Ok(notices) => notices,
        Err(error) => return error_response(error),
    };
    let unread = notices.iter().filter(|notice| notice.is_unread()).count();
    let payload = json!({ "notices": notices, "unread": unread });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn read_handler<R>(
    State(service): State<Arc<NoticeService<R>>>,
    Path(notice_id): Path<String>,
) -> Response
where
    R: NoticeRepository + 'static,
{
    match service.mark_read(&NoticeId(notice_id), Utc::now()) {
        Ok(notice) => (StatusCode::OK, axum::Json(notice)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<NoticeService<R>>>,
    Path(notice_id): Path<String>,
) -> Response
where
    R: NoticeRepository + 'static,
{
    match service.delete(&NoticeId(notice_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}
