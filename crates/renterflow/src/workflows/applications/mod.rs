//! Rental applications: renter intake reviewed and decided by the landlord.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    ApplicationDecision, ApplicationError, ApplicationId, ApplicationStatus, EmploymentRecord,
    NewApplication, RentalApplication,
};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::ApplicationService;
