//! Lease documents: sent by the landlord, completed by the renter, decided
//! by the landlord, all gated on the renter's board stage.

pub mod domain;
pub mod fill;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    LeaseAction, LeaseDocument, LeaseError, LeaseId, LeaseStatus, SignatureStatus,
};
pub use fill::{DocumentFill, FillError, FilledDocument, LeaseTemplate, PassthroughFill};
pub use repository::LeaseRepository;
pub use router::lease_router;
pub use service::{LeaseUpload, LeaseWorkflow};
