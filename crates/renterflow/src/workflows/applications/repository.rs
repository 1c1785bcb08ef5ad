use super::domain::{ApplicationId, RentalApplication};
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::RepositoryError;

/// Storage abstraction over the `applications` collection.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: RentalApplication)
        -> Result<RentalApplication, RepositoryError>;
    fn update(&self, application: RentalApplication) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<RentalApplication>, RepositoryError>;
    fn for_property(
        &self,
        property: &PropertyId,
    ) -> Result<Vec<RentalApplication>, RepositoryError>;
}
