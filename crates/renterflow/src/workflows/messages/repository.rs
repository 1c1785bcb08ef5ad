use super::domain::{MessageId, TenantMessage};
use crate::workflows::RepositoryError;

/// Storage abstraction over the `landlordMessages` collection.
pub trait MessageRepository: Send + Sync {
    fn insert(&self, message: TenantMessage) -> Result<TenantMessage, RepositoryError>;
    fn update(&self, message: TenantMessage) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &MessageId) -> Result<Option<TenantMessage>, RepositoryError>;
    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<TenantMessage>, RepositoryError>;
}
