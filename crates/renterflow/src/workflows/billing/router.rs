use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BillingError, InvoiceId, PaymentMethod};
use super::repository::BillingRepository;
use super::service::{BillingService, IssueInvoice};
use super::settlement::SettlementWorkflow;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::service::PropertyError;

/// Shared state for the billing routes: issuance plus settlement.
pub struct BillingRouterState<R> {
    pub invoices: Arc<BillingService<R>>,
    pub settlement: Arc<SettlementWorkflow<R>>,
}

impl<R> Clone for BillingRouterState<R> {
    fn clone(&self) -> Self {
        Self {
            invoices: self.invoices.clone(),
            settlement: self.settlement.clone(),
        }
    }
}

/// Router builder exposing invoice issuance, lookup, and payment settlement.
pub fn billing_router<R>(state: BillingRouterState<R>) -> Router
where
    R: BillingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/invoices",
            post(issue_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/invoices/:invoice_id", get(get_handler::<R>))
        .route(
            "/api/v1/invoices/:invoice_id/payment",
            post(payment_handler::<R>),
        )
        .route(
            "/api/v1/invoices/:invoice_id/payments",
            get(payments_handler::<R>),
        )
        .with_state(state)
}

fn error_response(error: BillingError) -> Response {
    let status = match &error {
        BillingError::NotFound | BillingError::Property(PropertyError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        BillingError::AccessDenied | BillingError::Property(PropertyError::AccessDenied) => {
            StatusCode::FORBIDDEN
        }
        BillingError::InvalidTransition { .. } | BillingError::Board(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueRequest {
    property_id: String,
    landlord_id: String,
    renter_email: String,
    #[serde(default)]
    include_pet_fee: bool,
    #[serde(default)]
    notes: Option<String>,
    due_on: NaiveDate,
}

pub(crate) async fn issue_handler<R>(
    State(state): State<BillingRouterState<R>>,
    axum::Json(request): axum::Json<IssueRequest>,
) -> Response
where
    R: BillingRepository + 'static,
{
    let intake = IssueInvoice {
        property_id: PropertyId(request.property_id),
        landlord_id: request.landlord_id,
        renter_email: request.renter_email,
        include_pet_fee: request.include_pet_fee,
        notes: request.notes,
        due_on: request.due_on,
    };
    match state.invoices.issue(intake, Utc::now()) {
        Ok(invoice) => (StatusCode::CREATED, axum::Json(invoice)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    landlord_id: String,
}

pub(crate) async fn list_handler<R>(
    State(state): State<BillingRouterState<R>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: BillingRepository + 'static,
{
    match state.invoices.list_for_landlord(&query.landlord_id) {
        Ok(invoices) => (StatusCode::OK, axum::Json(invoices)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(state): State<BillingRouterState<R>>,
    Path(invoice_id): Path<String>,
) -> Response
where
    R: BillingRepository + 'static,
{
    match state.invoices.get(&InvoiceId(invoice_id)) {
        Ok(invoice) => (StatusCode::OK, axum::Json(invoice)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentRequest {
    method: PaymentMethod,
    transaction_id: String,
}

pub(crate) async fn payment_handler<R>(
    State(state): State<BillingRouterState<R>>,
    Path(invoice_id): Path<String>,
    axum::Json(request): axum::Json<PaymentRequest>,
) -> Response
where
    R: BillingRepository + 'static,
{
    match state.settlement.settle(
        &InvoiceId(invoice_id),
        request.method,
        &request.transaction_id,
        Utc::now(),
    ) {
        Ok(outcome) => {
            let payload = json!({
                "invoice": outcome.invoice,
                "payments": outcome.payments,
                "newly_settled": outcome.newly_settled,
                "pending_projections": outcome.pending_projections,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn payments_handler<R>(
    State(state): State<BillingRouterState<R>>,
    Path(invoice_id): Path<String>,
) -> Response
where
    R: BillingRepository + 'static,
{
    match state.invoices.payments(&InvoiceId(invoice_id)) {
        Ok(payments) => (StatusCode::OK, axum::Json(payments)).into_response(),
        Err(error) => error_response(error),
    }
}
