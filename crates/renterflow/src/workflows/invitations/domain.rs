use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::board::domain::BoardError;
use crate::workflows::notices::service::NoticeError;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::service::PropertyError;
use crate::workflows::RepositoryError;

/// Identifier wrapper for landlord invitations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvitationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl InvitationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
            InvitationStatus::Expired => "expired",
        }
    }
}

/// The renter's answer to a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationReply {
    Accepted,
    Declined,
}

#[derive(Debug, thiserror::Error)]
pub enum InvitationError {
    #[error("invitation not found")]
    NotFound,
    #[error("invitation already resolved as {status}")]
    AlreadyResolved { status: &'static str },
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Notice(#[from] NoticeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A landlord's offer to a prospective renter, addressed by email because no
/// stable renter identity exists yet at this edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: InvitationId,
    pub property_id: PropertyId,
    pub landlord_id: String,
    pub renter_email: String,
    pub status: InvitationStatus,
    pub invited_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Only a pending invitation may be answered; everything else is settled.
    pub fn respond(
        &mut self,
        reply: InvitationReply,
        at: DateTime<Utc>,
    ) -> Result<(), InvitationError> {
        if self.status != InvitationStatus::Pending {
            return Err(InvitationError::AlreadyResolved {
                status: self.status.label(),
            });
        }
        self.status = match reply {
            InvitationReply::Accepted => InvitationStatus::Accepted,
            InvitationReply::Declined => InvitationStatus::Declined,
        };
        self.responded_at = Some(at);
        Ok(())
    }

    /// Returns true when the invitation moved to `Expired`.
    pub fn expire(&mut self, at: DateTime<Utc>) -> bool {
        if self.status != InvitationStatus::Pending {
            return false;
        }
        self.status = InvitationStatus::Expired;
        self.responded_at = Some(at);
        true
    }
}
