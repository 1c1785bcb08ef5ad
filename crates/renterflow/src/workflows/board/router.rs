use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::repository::RenterStatusRepository;
use super::service::BoardService;
use crate::workflows::properties::domain::PropertyId;

/// Router builder exposing the per-property status board.
pub fn board_router<R>(service: Arc<BoardService<R>>) -> Router
where
    R: RenterStatusRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/properties/:property_id/board",
            get(board_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn board_handler<R>(
    State(service): State<Arc<BoardService<R>>>,
    Path(property_id): Path<String>,
) -> Response
where
    R: RenterStatusRepository + 'static,
{
    match service.board_for_property(&PropertyId(property_id)) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
