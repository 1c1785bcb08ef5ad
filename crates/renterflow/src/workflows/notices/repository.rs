use super::domain::{Notice, NoticeId};
use crate::workflows::identity::RenterId;
use crate::workflows::leases::domain::LeaseId;
use crate::workflows::RepositoryError;

/// Storage abstraction over the `notices` collection. Queries return every
/// stored row for the key; visibility and kind filtering is the service's
/// concern.
pub trait NoticeRepository: Send + Sync {
    fn insert(&self, notice: Notice) -> Result<Notice, RepositoryError>;
    fn update(&self, notice: Notice) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &NoticeId) -> Result<Option<Notice>, RepositoryError>;
    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<Notice>, RepositoryError>;
    fn for_renter(&self, renter: &RenterId) -> Result<Vec<Notice>, RepositoryError>;
    fn for_lease(&self, lease: &LeaseId) -> Result<Vec<Notice>, RepositoryError>;
}
