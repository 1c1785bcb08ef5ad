//! The portal's workflow services. Each module owns one collection of the
//! document store behind a repository trait and exposes a service plus, where
//! a screen exists for it, an axum router.

pub mod applications;
pub mod billing;
pub mod board;
pub mod identity;
pub mod invitations;
pub mod leases;
pub mod messages;
pub mod notices;
pub mod properties;

/// Error enumeration shared by every repository trait.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Umbrella over the per-workflow errors, for callers driving several
/// workflows in one pass (the CLI demo, batch sweeps).
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Property(#[from] properties::service::PropertyError),
    #[error(transparent)]
    Invitation(#[from] invitations::domain::InvitationError),
    #[error(transparent)]
    Application(#[from] applications::domain::ApplicationError),
    #[error(transparent)]
    Lease(#[from] leases::domain::LeaseError),
    #[error(transparent)]
    Notice(#[from] notices::service::NoticeError),
    #[error(transparent)]
    Billing(#[from] billing::domain::BillingError),
    #[error(transparent)]
    Board(#[from] board::domain::BoardError),
    #[error(transparent)]
    Message(#[from] messages::domain::MessageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
