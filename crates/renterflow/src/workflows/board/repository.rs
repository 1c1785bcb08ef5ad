use super::domain::RenterStatusRecord;
use crate::workflows::identity::RenterId;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::RepositoryError;

/// Storage abstraction over the `renterStatus` collection. Implementations
/// must reject a second row for the same (property, renter) pair with
/// `Conflict`.
pub trait RenterStatusRepository: Send + Sync {
    fn insert(&self, record: RenterStatusRecord) -> Result<RenterStatusRecord, RepositoryError>;
    fn update(&self, record: RenterStatusRecord) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        property: &PropertyId,
        renter: &RenterId,
    ) -> Result<Option<RenterStatusRecord>, RepositoryError>;
    fn for_property(&self, property: &PropertyId)
        -> Result<Vec<RenterStatusRecord>, RepositoryError>;
}
