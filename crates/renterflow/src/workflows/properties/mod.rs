//! Property directory: the leaf collection every other workflow keys off.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Address, NewProperty, PetPolicy, PricingUpdate, Property, PropertyId, PropertyKind,
    PropertyStatus,
};
pub use repository::PropertyRepository;
pub use router::property_router;
pub use service::{fetch_owned, PropertyError, PropertyService};
