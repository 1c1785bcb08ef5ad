use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::billing::domain::InvoiceId;
use crate::workflows::identity::RenterId;
use crate::workflows::invitations::domain::InvitationId;
use crate::workflows::leases::domain::LeaseId;
use crate::workflows::properties::domain::PropertyId;

/// Identifier wrapper for notices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeId(pub String);

/// Every typed message the portal sends between landlord and renter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Eviction,
    LateRent,
    LeaseReceived,
    LeaseCompleted,
    LeaseAccepted,
    LeaseRejected,
    InvoiceSent,
    PaymentReceived,
    PaymentSuccessful,
    InvitationSent,
    InvitationAccepted,
    InvitationDeclined,
    ApplicationReceived,
    ApplicationApproved,
    ApplicationRejected,
    MaintenanceRequest,
    LegalNotice,
    InspectionScheduled,
    Custom,
}

impl NoticeKind {
    pub const fn label(self) -> &'static str {
        match self {
            NoticeKind::Eviction => "eviction",
            NoticeKind::LateRent => "late_rent",
            NoticeKind::LeaseReceived => "lease_received",
            NoticeKind::LeaseCompleted => "lease_completed",
            NoticeKind::LeaseAccepted => "lease_accepted",
            NoticeKind::LeaseRejected => "lease_rejected",
            NoticeKind::InvoiceSent => "invoice_sent",
            NoticeKind::PaymentReceived => "payment_received",
            NoticeKind::PaymentSuccessful => "payment_successful",
            NoticeKind::InvitationSent => "invitation_sent",
            NoticeKind::InvitationAccepted => "invitation_accepted",
            NoticeKind::InvitationDeclined => "invitation_declined",
            NoticeKind::ApplicationReceived => "application_received",
            NoticeKind::ApplicationApproved => "application_approved",
            NoticeKind::ApplicationRejected => "application_rejected",
            NoticeKind::MaintenanceRequest => "maintenance_request",
            NoticeKind::LegalNotice => "legal_notice",
            NoticeKind::InspectionScheduled => "inspection_scheduled",
            NoticeKind::Custom => "custom",
        }
    }

    /// Lease-status traffic lives in its own landlord inbox.
    pub const fn is_lease_status(self) -> bool {
        matches!(self, NoticeKind::LeaseReceived | NoticeKind::LeaseCompleted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeStatus {
    Unread,
    Read,
    Deleted,
}

impl NoticeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            NoticeStatus::Unread => "unread",
            NoticeStatus::Read => "read",
            NoticeStatus::Deleted => "deleted",
        }
    }
}

/// A delivered notice. `read_at` is monotonic: set at most once, never
/// cleared. Deletion is a status flip, not a removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub subject: String,
    pub message: String,
    pub landlord_id: String,
    pub property_id: PropertyId,
    pub renter_id: RenterId,
    pub lease_id: Option<LeaseId>,
    pub invoice_id: Option<InvoiceId>,
    pub invitation_id: Option<InvitationId>,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub status: NoticeStatus,
}

impl Notice {
    /// Returns true when this call transitioned the notice; a repeat call is
    /// a no-op and the original timestamp stands.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(at);
        if self.status == NoticeStatus::Unread {
            self.status = NoticeStatus::Read;
        }
        true
    }

    pub fn is_visible(&self) -> bool {
        self.status != NoticeStatus::Deleted
    }

    pub fn is_unread(&self) -> bool {
        self.is_visible() && self.read_at.is_none()
    }
}

/// Publication request; the notice service applies id, unread status, and
/// the sent timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeDraft {
    pub kind: NoticeKind,
    pub subject: String,
    pub message: String,
    pub landlord_id: String,
    pub property_id: PropertyId,
    pub renter_id: RenterId,
    pub lease_id: Option<LeaseId>,
    pub invoice_id: Option<InvoiceId>,
    pub invitation_id: Option<InvitationId>,
}

impl NoticeDraft {
    pub fn new(
        kind: NoticeKind,
        subject: impl Into<String>,
        message: impl Into<String>,
        landlord_id: impl Into<String>,
        property_id: PropertyId,
        renter_id: RenterId,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
            landlord_id: landlord_id.into(),
            property_id,
            renter_id,
            lease_id: None,
            invoice_id: None,
            invitation_id: None,
        }
    }

    pub fn about_lease(mut self, lease: LeaseId) -> Self {
        self.lease_id = Some(lease);
        self
    }

    pub fn about_invoice(mut self, invoice: InvoiceId) -> Self {
        self.invoice_id = Some(invoice);
        self
    }

    pub fn about_invitation(mut self, invitation: InvitationId) -> Self {
        self.invitation_id = Some(invitation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn notice() -> Notice {
        Notice {
            id: NoticeId("ntc-000001".to_string()),
            kind: NoticeKind::LeaseReceived,
            subject: "Lease ready to sign".to_string(),
            message: "Your lease is ready for review.".to_string(),
            landlord_id: "landlord-1".to_string(),
            property_id: PropertyId("prop-000001".to_string()),
            renter_id: RenterId("rtr-000001".to_string()),
            lease_id: None,
            invoice_id: None,
            invitation_id: None,
            sent_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            read_at: None,
            status: NoticeStatus::Unread,
        }
    }

    #[test]
    fn mark_read_is_monotonic_and_idempotent() {
        let mut notice = notice();
        let first = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap();

        assert!(notice.mark_read(first));
        assert_eq!(notice.read_at, Some(first));
        assert_eq!(notice.status, NoticeStatus::Read);

        assert!(!notice.mark_read(second));
        assert_eq!(notice.read_at, Some(first));
    }

    #[test]
    fn lease_status_kinds_are_partitioned() {
        assert!(NoticeKind::LeaseReceived.is_lease_status());
        assert!(NoticeKind::LeaseCompleted.is_lease_status());
        assert!(!NoticeKind::LeaseAccepted.is_lease_status());
        assert!(!NoticeKind::InvoiceSent.is_lease_status());
        assert!(!NoticeKind::Custom.is_lease_status());
    }

    #[test]
    fn deleted_notices_are_not_unread() {
        let mut notice = notice();
        notice.status = NoticeStatus::Deleted;
        assert!(!notice.is_visible());
        assert!(!notice.is_unread());
    }
}
