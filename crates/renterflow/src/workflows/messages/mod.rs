//! Renter-to-landlord messages with attachments backed by object storage.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{MessageAttachment, MessageError, MessageId, MessageStatus, TenantMessage};
pub use repository::MessageRepository;
pub use service::{AttachmentUpload, MessageService, NewMessage};
