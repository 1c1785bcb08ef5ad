//! Landlord invitations: the front door of the renter lifecycle.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Invitation, InvitationError, InvitationId, InvitationReply, InvitationStatus};
pub use repository::InvitationRepository;
pub use router::invitation_router;
pub use service::InvitationService;
