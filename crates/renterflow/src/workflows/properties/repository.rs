use super::domain::{Property, PropertyId};
use crate::workflows::RepositoryError;

/// Storage abstraction over the `properties` collection.
pub trait PropertyRepository: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn update(&self, property: Property) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<Property>, RepositoryError>;
}
