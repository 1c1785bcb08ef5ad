use super::domain::{Invitation, InvitationId};
use crate::workflows::RepositoryError;

/// Storage abstraction over the `invitations` collection.
pub trait InvitationRepository: Send + Sync {
    fn insert(&self, invitation: Invitation) -> Result<Invitation, RepositoryError>;
    fn update(&self, invitation: Invitation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &InvitationId) -> Result<Option<Invitation>, RepositoryError>;
    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<Invitation>, RepositoryError>;
    fn pending(&self) -> Result<Vec<Invitation>, RepositoryError>;
}
