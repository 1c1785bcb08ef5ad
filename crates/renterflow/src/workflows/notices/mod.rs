//! Typed notices between landlord and renter with read/unread state, the
//! publication seam the other workflows fan into, and role-filtered inboxes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Notice, NoticeDraft, NoticeId, NoticeKind, NoticeStatus};
pub use repository::NoticeRepository;
pub use router::notice_router;
pub use service::{NoticeError, NoticeService, NoticeSink};
