use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::board::domain::BoardError;
use crate::workflows::notices::service::NoticeError;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::service::PropertyError;
use crate::workflows::RepositoryError;

/// Identifier wrapper for rental applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Review may pass through `Pending` or decide straight from `Submitted`;
    /// decisions are terminal.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Submitted, ApplicationStatus::Pending)
                | (ApplicationStatus::Submitted, ApplicationStatus::Approved)
                | (ApplicationStatus::Submitted, ApplicationStatus::Rejected)
                | (ApplicationStatus::Pending, ApplicationStatus::Approved)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
        )
    }
}

/// The landlord's decision on a reviewed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationDecision {
    Approve,
    Reject,
}

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("application not found")]
    NotFound,
    #[error("invalid application transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Notice(#[from] NoticeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Employment details collected uniformly from every applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    pub employer: String,
    pub position: String,
    pub monthly_income: u32,
    pub months_employed: u32,
}

/// A renter-submitted application for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalApplication {
    pub id: ApplicationId,
    pub property_id: PropertyId,
    pub renter_email: String,
    pub full_name: String,
    pub employment: EmploymentRecord,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl RentalApplication {
    pub fn transition(
        &mut self,
        next: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ApplicationError> {
        if !self.status.can_transition_to(next) {
            return Err(ApplicationError::InvalidTransition {
                from: self.status.label(),
                to: next.label(),
            });
        }
        self.status = next;
        if matches!(next, ApplicationStatus::Approved | ApplicationStatus::Rejected) {
            self.decided_at = Some(at);
        }
        Ok(())
    }

    /// Case-insensitive substring match over name, email, and property line.
    pub fn matches_query(&self, property_line: &str, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.full_name.to_lowercase().contains(&query)
            || self.renter_email.to_lowercase().contains(&query)
            || property_line.to_lowercase().contains(&query)
    }
}

/// Intake shape for a new application.
#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub property_id: PropertyId,
    pub renter_email: String,
    pub full_name: String,
    pub employment: EmploymentRecord,
}
