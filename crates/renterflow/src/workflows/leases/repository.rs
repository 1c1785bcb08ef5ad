use super::domain::{LeaseDocument, LeaseId};
use crate::workflows::identity::RenterId;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::RepositoryError;

/// Storage abstraction over the `leases` collection.
pub trait LeaseRepository: Send + Sync {
    fn insert(&self, lease: LeaseDocument) -> Result<LeaseDocument, RepositoryError>;
    fn update(&self, lease: LeaseDocument) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeaseId) -> Result<Option<LeaseDocument>, RepositoryError>;
    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<LeaseDocument>, RepositoryError>;
    fn for_parties(
        &self,
        property: &PropertyId,
        renter: &RenterId,
    ) -> Result<Vec<LeaseDocument>, RepositoryError>;
}
