use crate::infra::{AppState, Portal};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use axum::Router;
use serde_json::json;
use std::sync::atomic::Ordering;

use renterflow::workflows::applications::application_router;
use renterflow::workflows::billing::{billing_router, BillingRouterState};
use renterflow::workflows::board::board_router;
use renterflow::workflows::invitations::invitation_router;
use renterflow::workflows::leases::lease_router;
use renterflow::workflows::notices::notice_router;
use renterflow::workflows::properties::property_router;

/// Assemble every workflow router plus the operational endpoints.
pub(crate) fn with_portal_routes(portal: &Portal) -> Router {
    Router::new()
        .merge(property_router(portal.properties.clone()))
        .merge(invitation_router(portal.invitations.clone()))
        .merge(application_router(portal.applications.clone()))
        .merge(lease_router(portal.leases.clone()))
        .merge(notice_router(portal.notices.clone()))
        .merge(board_router(portal.board.clone()))
        .merge(billing_router(BillingRouterState {
            invoices: portal.billing.clone(),
            settlement: portal.settlement.clone(),
        }))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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
