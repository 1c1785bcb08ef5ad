use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fill::FillError;
use crate::storage::StorageError;
use crate::workflows::board::domain::BoardError;
use crate::workflows::identity::RenterId;
use crate::workflows::notices::service::NoticeError;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::service::PropertyError;
use crate::workflows::RepositoryError;

/// Identifier wrapper for lease documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaseId(pub String);

/// Lease document lifecycle. Legacy records used `pending` interchangeably
/// with `sent`; it is accepted on input and never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    Draft,
    #[serde(alias = "pending")]
    Sent,
    RenterCompleted,
    Accepted,
    Rejected,
    Active,
    Completed,
    Terminated,
}

impl LeaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeaseStatus::Draft => "draft",
            LeaseStatus::Sent => "sent",
            LeaseStatus::RenterCompleted => "renter_completed",
            LeaseStatus::Accepted => "accepted",
            LeaseStatus::Rejected => "rejected",
            LeaseStatus::Active => "active",
            LeaseStatus::Completed => "completed",
            LeaseStatus::Terminated => "terminated",
        }
    }

    /// Forward-only moves; `Rejected`, `Completed`, and `Terminated` are
    /// terminal.
    pub fn can_transition_to(self, next: LeaseStatus) -> bool {
        matches!(
            (self, next),
            (LeaseStatus::Draft, LeaseStatus::Sent)
                | (LeaseStatus::Sent, LeaseStatus::RenterCompleted)
                | (LeaseStatus::RenterCompleted, LeaseStatus::Accepted)
                | (LeaseStatus::RenterCompleted, LeaseStatus::Rejected)
                | (LeaseStatus::Accepted, LeaseStatus::Active)
                | (LeaseStatus::Active, LeaseStatus::Completed)
                | (LeaseStatus::Active, LeaseStatus::Terminated)
        )
    }
}

/// The landlord's review verdict on a renter-completed lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseAction {
    Accept,
    Reject,
}

/// Who has signed what, mirrored onto the document as the parties act.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureStatus {
    pub landlord_signed: bool,
    pub renter_signed: bool,
    pub co_signer_required: bool,
    pub co_signer_signed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SignatureStatus {
    /// All required parties have signed.
    pub fn is_complete(&self) -> bool {
        self.landlord_signed
            && self.renter_signed
            && (!self.co_signer_required || self.co_signer_signed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeaseError {
    #[error("lease not found")]
    NotFound,
    #[error("lease belongs to another renter")]
    WrongRenter,
    #[error("invalid lease transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("lease actions require the renter status stage 'lease', found '{stage}'")]
    StageGate { stage: String },
    #[error(transparent)]
    Fill(#[from] FillError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Notice(#[from] NoticeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One lease document flowing landlord -> renter -> landlord. The filled URL
/// starts as the template reference and is replaced by the renter's upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseDocument {
    pub id: LeaseId,
    pub property_id: PropertyId,
    pub landlord_id: String,
    pub renter_id: RenterId,
    pub renter_email: String,
    pub template_name: String,
    pub original_template_url: String,
    pub filled_pdf_url: String,
    pub status: LeaseStatus,
    pub signature: SignatureStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub renter_completed_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl LeaseDocument {
    pub fn transition(&mut self, next: LeaseStatus, at: DateTime<Utc>) -> Result<(), LeaseError> {
        if !self.status.can_transition_to(next) {
            return Err(LeaseError::InvalidTransition {
                from: self.status.label(),
                to: next.label(),
            });
        }
        self.status = next;
        match next {
            LeaseStatus::Sent => self.sent_at = Some(at),
            LeaseStatus::RenterCompleted => self.renter_completed_at = Some(at),
            LeaseStatus::Accepted | LeaseStatus::Rejected => self.decided_at = Some(at),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lease(status: LeaseStatus) -> LeaseDocument {
        LeaseDocument {
            id: LeaseId("lease-000001".to_string()),
            property_id: PropertyId("prop-000001".to_string()),
            landlord_id: "landlord-1".to_string(),
            renter_id: RenterId("rtr-000001".to_string()),
            renter_email: "renter@example.com".to_string(),
            template_name: "standard-lease".to_string(),
            original_template_url: "https://storage.local/templates/standard.pdf".to_string(),
            filled_pdf_url: "https://storage.local/templates/standard.pdf".to_string(),
            status,
            signature: SignatureStatus::default(),
            sent_at: None,
            renter_completed_at: None,
            decided_at: None,
        }
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        let mut lease = lease(LeaseStatus::Draft);
        lease.transition(LeaseStatus::Sent, Utc::now()).expect("send");
        lease
            .transition(LeaseStatus::RenterCompleted, Utc::now())
            .expect("renter completes");
        lease
            .transition(LeaseStatus::Accepted, Utc::now())
            .expect("landlord accepts");
        lease
            .transition(LeaseStatus::Active, Utc::now())
            .expect("activates");

        assert!(lease.sent_at.is_some());
        assert!(lease.renter_completed_at.is_some());
        assert!(lease.decided_at.is_some());
    }

    #[test]
    fn terminal_statuses_never_reverse() {
        for terminal in [
            LeaseStatus::Rejected,
            LeaseStatus::Completed,
            LeaseStatus::Terminated,
        ] {
            let mut doc = lease(terminal);
            for next in [
                LeaseStatus::Draft,
                LeaseStatus::Sent,
                LeaseStatus::RenterCompleted,
                LeaseStatus::Accepted,
                LeaseStatus::Active,
            ] {
                assert!(
                    matches!(
                        doc.transition(next, Utc::now()),
                        Err(LeaseError::InvalidTransition { .. })
                    ),
                    "{} should not reach {}",
                    terminal.label(),
                    next.label()
                );
            }
        }
    }

    #[test]
    fn skipping_the_renter_is_rejected() {
        let mut doc = lease(LeaseStatus::Sent);
        assert!(matches!(
            doc.transition(LeaseStatus::Accepted, Utc::now()),
            Err(LeaseError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn legacy_pending_deserializes_as_sent() {
        let status: LeaseStatus = serde_json::from_str("\"pending\"").expect("alias accepted");
        assert_eq!(status, LeaseStatus::Sent);
        assert_eq!(
            serde_json::to_string(&LeaseStatus::Sent).expect("serializes"),
            "\"sent\""
        );
    }

    #[test]
    fn signature_completion_accounts_for_co_signer() {
        let mut signature = SignatureStatus {
            landlord_signed: true,
            renter_signed: true,
            ..SignatureStatus::default()
        };
        assert!(signature.is_complete());

        signature.co_signer_required = true;
        assert!(!signature.is_complete());
        signature.co_signer_signed = true;
        assert!(signature.is_complete());
    }
}
