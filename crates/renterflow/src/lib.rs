//! Workflow services for a landlord/renter property management portal.
//!
//! The portal's lifecycle — invite, apply, lease, invoice, settle — is modeled
//! as workflow services composed over repository traits, so the hosted
//! document store and object storage stay behind seams that the server, the
//! CLI demo, and the tests all exercise the same way.

pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod telemetry;
pub mod workflows;
