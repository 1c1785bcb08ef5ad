//! Invoices and payment settlement: pricing derived from the property,
//! breakdown fan-out into payment records, and the outbox-driven projections
//! that absorb a successful payment.

pub mod domain;
pub mod projections;
pub mod repository;
pub mod router;
pub mod service;
pub mod settlement;

pub use domain::{
    BillingError, Invoice, InvoiceBreakdown, InvoiceId, InvoiceStatus, PaymentId, PaymentKind,
    PaymentMethod, PaymentSettled, PaymentStatus, PropertySnapshot, RentPayment, SettlementOutbox,
};
pub use projections::{
    standard_projections, BoardStageProjection, LeaseActivationProjection, NoticeFanoutProjection,
    OccupancyProjection,
};
pub use repository::BillingRepository;
pub use router::{billing_router, BillingRouterState};
pub use service::{BillingService, IssueInvoice};
pub use settlement::{
    ProjectionError, SettlementOutcome, SettlementProjection, SettlementWorkflow,
};
