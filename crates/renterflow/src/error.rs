use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::applications::domain::ApplicationError;
use crate::workflows::billing::domain::BillingError;
use crate::workflows::board::domain::BoardError;
use crate::workflows::invitations::domain::InvitationError;
use crate::workflows::leases::domain::LeaseError;
use crate::workflows::messages::domain::MessageError;
use crate::workflows::notices::service::NoticeError;
use crate::workflows::properties::service::PropertyError;
use crate::workflows::WorkflowError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Workflow(WorkflowError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Workflow(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Workflow(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<WorkflowError> for AppError {
    fn from(value: WorkflowError) -> Self {
        Self::Workflow(value)
    }
}

impl From<PropertyError> for AppError {
    fn from(value: PropertyError) -> Self {
        Self::Workflow(value.into())
    }
}

impl From<InvitationError> for AppError {
    fn from(value: InvitationError) -> Self {
        Self::Workflow(value.into())
    }
}

impl From<ApplicationError> for AppError {
    fn from(value: ApplicationError) -> Self {
        Self::Workflow(value.into())
    }
}

impl From<LeaseError> for AppError {
    fn from(value: LeaseError) -> Self {
        Self::Workflow(value.into())
    }
}

impl From<NoticeError> for AppError {
    fn from(value: NoticeError) -> Self {
        Self::Workflow(value.into())
    }
}

impl From<BillingError> for AppError {
    fn from(value: BillingError) -> Self {
        Self::Workflow(value.into())
    }
}

impl From<BoardError> for AppError {
    fn from(value: BoardError) -> Self {
        Self::Workflow(value.into())
    }
}

impl From<MessageError> for AppError {
    fn from(value: MessageError) -> Self {
        Self::Workflow(value.into())
    }
}
