use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{NewProperty, PricingUpdate, PropertyId, PropertyStatus};
use super::repository::PropertyRepository;
use super::service::{PropertyError, PropertyService};

/// Router builder exposing HTTP endpoints for the property directory.
pub fn property_router<R>(service: Arc<PropertyService<R>>) -> Router
where
    R: PropertyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/properties",
            post(register_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/properties/:property_id", get(get_handler::<R>))
        .route(
            "/api/v1/properties/:property_id/pricing",
            post(pricing_handler::<R>),
        )
        .route(
            "/api/v1/properties/:property_id/status",
            post(status_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: PropertyError) -> Response {
    let status = match &error {
        PropertyError::NotFound => StatusCode::NOT_FOUND,
        PropertyError::AccessDenied => StatusCode::FORBIDDEN,
        PropertyError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<PropertyService<R>>>,
    axum::Json(listing): axum::Json<NewProperty>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    match service.register(listing) {
        Ok(property) => (StatusCode::CREATED, axum::Json(property)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    landlord_id: String,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<PropertyService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    match service.list_by_landlord(&query.landlord_id) {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<PropertyService<R>>>,
    Path(property_id): Path<String>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    match service.get(&PropertyId(property_id)) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PricingRequest {
    landlord_id: String,
    #[serde(flatten)]
    pricing: PricingUpdate,
}

pub(crate) async fn pricing_handler<R>(
    State(service): State<Arc<PropertyService<R>>>,
    Path(property_id): Path<String>,
    axum::Json(request): axum::Json<PricingRequest>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    match service.update_pricing(
        &PropertyId(property_id),
        &request.landlord_id,
        request.pricing,
    ) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    landlord_id: String,
    status: PropertyStatus,
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<PropertyService<R>>>,
    Path(property_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    match service.set_status(&PropertyId(property_id), &request.landlord_id, request.status) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(error) => error_response(error),
    }
}
