//! Renter status board: one row per (property, renter), advanced through an
//! explicit stage transition table by the other workflows.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{BoardError, BoardRowView, RenterStage, RenterStatusRecord};
pub use repository::RenterStatusRepository;
pub use router::board_router;
pub use service::{BoardService, StatusBoard};
