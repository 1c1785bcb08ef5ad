use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{
    MessageAttachment, MessageError, MessageId, MessageStatus, TenantMessage,
};
use super::repository::MessageRepository;
use crate::storage::ObjectStore;
use crate::workflows::identity::RenterId;
use crate::workflows::leases::domain::LeaseId;
use crate::workflows::properties::domain::PropertyId;

static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_message_id() -> MessageId {
    let id = MESSAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MessageId(format!("msg-{id:06}"))
}

/// A file the renter attaches before the message is stored.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

/// Intake shape for a renter message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub renter_id: RenterId,
    pub landlord_id: String,
    pub property_id: PropertyId,
    pub lease_id: Option<LeaseId>,
    pub body: String,
    pub attachments: Vec<AttachmentUpload>,
}

/// Service owning renter-to-landlord messages and their attachment blobs.
pub struct MessageService<R> {
    repository: Arc<R>,
    storage: Arc<dyn ObjectStore>,
}

impl<R> MessageService<R>
where
    R: MessageRepository + 'static,
{
    pub fn new(repository: Arc<R>, storage: Arc<dyn ObjectStore>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub fn send(
        &self,
        intake: NewMessage,
        at: DateTime<Utc>,
    ) -> Result<TenantMessage, MessageError> {
        let id = next_message_id();

        let mut attachments = Vec::with_capacity(intake.attachments.len());
        for upload in intake.attachments {
            let key = format!("messages/{}/{}", id.0, upload.file_name);
            let stored = self
                .storage
                .put(&key, upload.bytes, &upload.content_type)?;
            attachments.push(MessageAttachment {
                name: upload.file_name,
                size: stored.size,
                content_type: stored.content_type,
                url: stored.url,
            });
        }

        let message = TenantMessage {
            id,
            renter_id: intake.renter_id,
            landlord_id: intake.landlord_id,
            property_id: intake.property_id,
            lease_id: intake.lease_id,
            body: intake.body,
            attachments,
            status: MessageStatus::Unread,
            sent_at: at,
            read_at: None,
        };

        let stored = self.repository.insert(message)?;
        Ok(stored)
    }

    pub fn inbox_for_landlord(
        &self,
        landlord_id: &str,
    ) -> Result<Vec<TenantMessage>, MessageError> {
        let mut messages: Vec<TenantMessage> = self
            .repository
            .for_landlord(landlord_id)?
            .into_iter()
            .filter(TenantMessage::is_visible)
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(messages)
    }

    pub fn mark_read(
        &self,
        id: &MessageId,
        at: DateTime<Utc>,
    ) -> Result<TenantMessage, MessageError> {
        let mut message = self.repository.fetch(id)?.ok_or(MessageError::NotFound)?;
        if message.mark_read(at) {
            self.repository.update(message.clone())?;
        }
        Ok(message)
    }

    /// Soft-delete the message and purge its attachment blobs. A blob that
    /// cannot be removed is logged and left behind rather than blocking the
    /// delete.
    pub fn delete(&self, id: &MessageId) -> Result<(), MessageError> {
        let mut message = self.repository.fetch(id)?.ok_or(MessageError::NotFound)?;
        if message.status == MessageStatus::Deleted {
            return Ok(());
        }

        for attachment in &message.attachments {
            if let Err(error) = self.storage.delete_by_url(&attachment.url) {
                warn!(url = %attachment.url, %error, "failed to remove message attachment");
            }
        }

        message.status = MessageStatus::Deleted;
        self.repository.update(message)?;
        Ok(())
    }
}
