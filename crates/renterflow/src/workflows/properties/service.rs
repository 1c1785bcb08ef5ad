use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::domain::{
    NewProperty, PetPolicy, PricingUpdate, Property, PropertyId, PropertyStatus,
};
use super::repository::PropertyRepository;
use crate::workflows::RepositoryError;

static PROPERTY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_property_id() -> PropertyId {
    let id = PROPERTY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PropertyId(format!("prop-{id:06}"))
}

/// Error raised by directory operations.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("property not found")]
    NotFound,
    #[error("access denied: property belongs to another landlord")]
    AccessDenied,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Fetch a property and verify the acting landlord owns it. Shared by every
/// workflow that mutates on a landlord's behalf.
pub fn fetch_owned(
    repository: &dyn PropertyRepository,
    id: &PropertyId,
    landlord_id: &str,
) -> Result<Property, PropertyError> {
    let property = repository.fetch(id)?.ok_or(PropertyError::NotFound)?;
    if property.landlord_id != landlord_id {
        return Err(PropertyError::AccessDenied);
    }
    Ok(property)
}

/// Service owning property records: registration, pricing, and status.
pub struct PropertyService<R> {
    repository: Arc<R>,
}

impl<R> PropertyService<R>
where
    R: PropertyRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn register(&self, listing: NewProperty) -> Result<Property, PropertyError> {
        let property = Property {
            id: next_property_id(),
            landlord_id: listing.landlord_id,
            address: listing.address,
            kind: listing.kind,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            square_feet: listing.square_feet,
            monthly_rent: listing.monthly_rent,
            security_deposit: listing.security_deposit,
            application_fee: listing.application_fee,
            pet_policy: listing.pet_policy.unwrap_or_else(PetPolicy::none),
            status: PropertyStatus::Available,
            image_urls: listing.image_urls,
        };

        let stored = self.repository.insert(property)?;
        Ok(stored)
    }

    pub fn get(&self, id: &PropertyId) -> Result<Property, PropertyError> {
        self.repository.fetch(id)?.ok_or(PropertyError::NotFound)
    }

    pub fn list_by_landlord(&self, landlord_id: &str) -> Result<Vec<Property>, PropertyError> {
        Ok(self.repository.for_landlord(landlord_id)?)
    }

    pub fn update_pricing(
        &self,
        id: &PropertyId,
        landlord_id: &str,
        pricing: PricingUpdate,
    ) -> Result<Property, PropertyError> {
        let mut property = fetch_owned(self.repository.as_ref(), id, landlord_id)?;

        if let Some(rent) = pricing.monthly_rent {
            property.monthly_rent = rent;
        }
        if let Some(deposit) = pricing.security_deposit {
            property.security_deposit = deposit;
        }
        if let Some(fee) = pricing.application_fee {
            property.application_fee = fee;
        }
        if let Some(pet_fee) = pricing.pet_fee {
            property.pet_policy.fee = pet_fee;
        }

        self.repository.update(property.clone())?;
        Ok(property)
    }

    pub fn set_status(
        &self,
        id: &PropertyId,
        landlord_id: &str,
        status: PropertyStatus,
    ) -> Result<Property, PropertyError> {
        let mut property = fetch_owned(self.repository.as_ref(), id, landlord_id)?;
        property.status = status;
        self.repository.update(property.clone())?;
        Ok(property)
    }
}
