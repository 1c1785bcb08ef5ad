use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{Notice, NoticeDraft, NoticeId, NoticeKind, NoticeStatus};
use super::repository::NoticeRepository;
use crate::workflows::identity::RenterId;
use crate::workflows::leases::domain::LeaseId;
use crate::workflows::RepositoryError;

static NOTICE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notice_id() -> NoticeId {
    let id = NOTICE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NoticeId(format!("ntc-{id:06}"))
}

/// Error raised by notice operations.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    #[error("notice not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outbound publication seam. Every workflow that produces a notice goes
/// through this trait rather than reaching into the notice store.
pub trait NoticeSink: Send + Sync {
    fn publish(&self, draft: NoticeDraft, at: DateTime<Utc>) -> Result<Notice, NoticeError>;

    /// Bulk read used when a lease moves forward and its earlier traffic of
    /// one kind is superseded (e.g. `lease_received` once the renter signs).
    /// Returns how many notices actually flipped.
    fn mark_lease_notices_read(
        &self,
        lease: &LeaseId,
        kind: NoticeKind,
        at: DateTime<Utc>,
    ) -> Result<usize, NoticeError>;
}

/// Service owning the notice fabric: publication, role-filtered inboxes,
/// monotonic reads, and soft deletion.
pub struct NoticeService<R> {
    repository: Arc<R>,
}

impl<R> NoticeService<R>
where
    R: NoticeRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Landlord inbox, excluding lease-status traffic and deleted notices.
    pub fn landlord_inbox(&self, landlord_id: &str) -> Result<Vec<Notice>, NoticeError> {
        let notices = self.repository.for_landlord(landlord_id)?;
        Ok(sorted(
            notices
                .into_iter()
                .filter(|notice| notice.is_visible() && !notice.kind.is_lease_status())
                .collect(),
        ))
    }

    /// Landlord inbox restricted to lease-status notices.
    pub fn landlord_lease_inbox(&self, landlord_id: &str) -> Result<Vec<Notice>, NoticeError> {
        let notices = self.repository.for_landlord(landlord_id)?;
        Ok(sorted(
            notices
                .into_iter()
                .filter(|notice| notice.is_visible() && notice.kind.is_lease_status())
                .collect(),
        ))
    }

    pub fn renter_inbox(&self, renter: &RenterId) -> Result<Vec<Notice>, NoticeError> {
        let notices = self.repository.for_renter(renter)?;
        Ok(sorted(
            notices.into_iter().filter(Notice::is_visible).collect(),
        ))
    }

    pub fn unread_for_landlord(&self, landlord_id: &str) -> Result<usize, NoticeError> {
        Ok(self
            .landlord_inbox(landlord_id)?
            .iter()
            .filter(|notice| notice.is_unread())
            .count())
    }

    pub fn unread_for_renter(&self, renter: &RenterId) -> Result<usize, NoticeError> {
        Ok(self
            .renter_inbox(renter)?
            .iter()
            .filter(|notice| notice.is_unread())
            .count())
    }

    /// Sets `read_at` once. A second call returns the notice unchanged.
    pub fn mark_read(&self, id: &NoticeId, at: DateTime<Utc>) -> Result<Notice, NoticeError> {
        let mut notice = self.repository.fetch(id)?.ok_or(NoticeError::NotFound)?;
        if notice.mark_read(at) {
            self.repository.update(notice.clone())?;
        }
        Ok(notice)
    }

    /// Soft delete; the notice drops out of every inbox but stays stored.
    pub fn delete(&self, id: &NoticeId) -> Result<(), NoticeError> {
        let mut notice = self.repository.fetch(id)?.ok_or(NoticeError::NotFound)?;
        if notice.status != NoticeStatus::Deleted {
            notice.status = NoticeStatus::Deleted;
            self.repository.update(notice)?;
        }
        Ok(())
    }
}

fn sorted(mut notices: Vec<Notice>) -> Vec<Notice> {
    notices.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    notices
}

impl<R> NoticeSink for NoticeService<R>
where
    R: NoticeRepository + 'static,
{
    fn publish(&self, draft: NoticeDraft, at: DateTime<Utc>) -> Result<Notice, NoticeError> {
        let notice = Notice {
            id: next_notice_id(),
            kind: draft.kind,
            subject: draft.subject,
            message: draft.message,
            landlord_id: draft.landlord_id,
            property_id: draft.property_id,
            renter_id: draft.renter_id,
            lease_id: draft.lease_id,
            invoice_id: draft.invoice_id,
            invitation_id: draft.invitation_id,
            sent_at: at,
            read_at: None,
            status: NoticeStatus::Unread,
        };

        let stored = self.repository.insert(notice)?;
        Ok(stored)
    }

    fn mark_lease_notices_read(
        &self,
        lease: &LeaseId,
        kind: NoticeKind,
        at: DateTime<Utc>,
    ) -> Result<usize, NoticeError> {
        let notices = self.repository.for_lease(lease)?;
        let mut marked = 0;
        for mut notice in notices {
            if notice.kind == kind && notice.is_visible() && notice.mark_read(at) {
                self.repository.update(notice)?;
                marked += 1;
            }
        }
        Ok(marked)
    }
}
