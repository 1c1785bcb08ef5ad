use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::StorageError;
use crate::workflows::identity::RenterId;
use crate::workflows::leases::domain::LeaseId;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::RepositoryError;

/// Identifier wrapper for renter messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Unread,
    Read,
    Deleted,
}

impl MessageStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MessageStatus::Unread => "unread",
            MessageStatus::Read => "read",
            MessageStatus::Deleted => "deleted",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A stored attachment reference; the blob lives in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttachment {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub url: String,
}

/// A renter-to-landlord message with optional attachments. Deleting flips the
/// status and purges the attachment blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantMessage {
    pub id: MessageId,
    pub renter_id: RenterId,
    pub landlord_id: String,
    pub property_id: PropertyId,
    pub lease_id: Option<LeaseId>,
    pub body: String,
    pub attachments: Vec<MessageAttachment>,
    pub status: MessageStatus,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl TenantMessage {
    /// Monotonic like notice reads: set once, never moved.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(at);
        if self.status == MessageStatus::Unread {
            self.status = MessageStatus::Read;
        }
        true
    }

    pub fn is_visible(&self) -> bool {
        self.status != MessageStatus::Deleted
    }
}
