//! In-memory implementations of every repository trait, standing in for the
//! hosted document store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::workflows::applications::domain::{ApplicationId, RentalApplication};
use crate::workflows::applications::repository::ApplicationRepository;
use crate::workflows::billing::domain::{
    Invoice, InvoiceId, InvoiceStatus, RentPayment, SettlementOutbox,
};
use crate::workflows::billing::repository::BillingRepository;
use crate::workflows::board::domain::RenterStatusRecord;
use crate::workflows::board::repository::RenterStatusRepository;
use crate::workflows::identity::{RenterDirectory, RenterId, RenterProfile};
use crate::workflows::invitations::domain::{Invitation, InvitationId, InvitationStatus};
use crate::workflows::invitations::repository::InvitationRepository;
use crate::workflows::leases::domain::{LeaseDocument, LeaseId};
use crate::workflows::leases::repository::LeaseRepository;
use crate::workflows::messages::domain::{MessageId, TenantMessage};
use crate::workflows::messages::repository::MessageRepository;
use crate::workflows::notices::domain::{Notice, NoticeId};
use crate::workflows::notices::repository::NoticeRepository;
use crate::workflows::properties::domain::{Property, PropertyId};
use crate::workflows::properties::repository::PropertyRepository;
use crate::workflows::RepositoryError;

#[derive(Default, Clone)]
pub struct MemoryProperties {
    records: Arc<Mutex<HashMap<PropertyId, Property>>>,
}

impl PropertyRepository for MemoryProperties {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&property.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(property.id.clone(), property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&property.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(property.id.clone(), property);
        Ok(())
    }

    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<Property>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|property| property.landlord_id == landlord_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryInvitations {
    records: Arc<Mutex<HashMap<InvitationId, Invitation>>>,
}

impl InvitationRepository for MemoryInvitations {
    fn insert(&self, invitation: Invitation) -> Result<Invitation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&invitation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(invitation.id.clone(), invitation.clone());
        Ok(invitation)
    }

    fn update(&self, invitation: Invitation) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&invitation.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(invitation.id.clone(), invitation);
        Ok(())
    }

    fn fetch(&self, id: &InvitationId) -> Result<Option<Invitation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<Invitation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|invitation| invitation.landlord_id == landlord_id)
            .cloned()
            .collect())
    }

    fn pending(&self) -> Result<Vec<Invitation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|invitation| invitation.status == InvitationStatus::Pending)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryApplications {
    records: Arc<Mutex<HashMap<ApplicationId, RentalApplication>>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(
        &self,
        application: RentalApplication,
    ) -> Result<RentalApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: RentalApplication) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<RentalApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_property(
        &self,
        property: &PropertyId,
    ) -> Result<Vec<RentalApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.property_id == property)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryLeases {
    records: Arc<Mutex<HashMap<LeaseId, LeaseDocument>>>,
}

impl LeaseRepository for MemoryLeases {
    fn insert(&self, lease: LeaseDocument) -> Result<LeaseDocument, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&lease.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(lease.id.clone(), lease.clone());
        Ok(lease)
    }

    fn update(&self, lease: LeaseDocument) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&lease.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(lease.id.clone(), lease);
        Ok(())
    }

    fn fetch(&self, id: &LeaseId) -> Result<Option<LeaseDocument>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<LeaseDocument>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|lease| lease.landlord_id == landlord_id)
            .cloned()
            .collect())
    }

    fn for_parties(
        &self,
        property: &PropertyId,
        renter: &RenterId,
    ) -> Result<Vec<LeaseDocument>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|lease| &lease.property_id == property && &lease.renter_id == renter)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryNotices {
    records: Arc<Mutex<HashMap<NoticeId, Notice>>>,
}

impl NoticeRepository for MemoryNotices {
    fn insert(&self, notice: Notice) -> Result<Notice, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&notice.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(notice.id.clone(), notice.clone());
        Ok(notice)
    }

    fn update(&self, notice: Notice) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&notice.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(notice.id.clone(), notice);
        Ok(())
    }

    fn fetch(&self, id: &NoticeId) -> Result<Option<Notice>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<Notice>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|notice| notice.landlord_id == landlord_id)
            .cloned()
            .collect())
    }

    fn for_renter(&self, renter: &RenterId) -> Result<Vec<Notice>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|notice| &notice.renter_id == renter)
            .cloned()
            .collect())
    }

    fn for_lease(&self, lease: &LeaseId) -> Result<Vec<Notice>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|notice| notice.lease_id.as_ref() == Some(lease))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryBoard {
    records: Arc<Mutex<HashMap<(PropertyId, RenterId), RenterStatusRecord>>>,
}

impl RenterStatusRepository for MemoryBoard {
    fn insert(&self, record: RenterStatusRecord) -> Result<RenterStatusRecord, RepositoryError> {
        let key = (record.property_id.clone(), record.renter_id.clone());
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn update(&self, record: RenterStatusRecord) -> Result<(), RepositoryError> {
        let key = (record.property_id.clone(), record.renter_id.clone());
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&key) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(key, record);
        Ok(())
    }

    fn fetch(
        &self,
        property: &PropertyId,
        renter: &RenterId,
    ) -> Result<Option<RenterStatusRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(property.clone(), renter.clone())).cloned())
    }

    fn for_property(
        &self,
        property: &PropertyId,
    ) -> Result<Vec<RenterStatusRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.property_id == property)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryBilling {
    invoices: Arc<Mutex<HashMap<InvoiceId, Invoice>>>,
    payments: Arc<Mutex<Vec<RentPayment>>>,
    outbox: Arc<Mutex<HashMap<InvoiceId, SettlementOutbox>>>,
}

impl BillingRepository for MemoryBilling {
    fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice, RepositoryError> {
        let mut guard = self.invoices.lock().expect("repository mutex poisoned");
        if guard.contains_key(&invoice.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(invoice.id.clone(), invoice.clone());
        Ok(invoice)
    }

    fn update_invoice(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        let mut guard = self.invoices.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&invoice.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(invoice.id.clone(), invoice);
        Ok(())
    }

    fn fetch_invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let guard = self.invoices.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn invoices_for_landlord(&self, landlord_id: &str) -> Result<Vec<Invoice>, RepositoryError> {
        let guard = self.invoices.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|invoice| invoice.landlord_id == landlord_id)
            .cloned()
            .collect())
    }

    fn open_invoices(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let guard = self.invoices.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|invoice| invoice.status == InvoiceStatus::Sent)
            .cloned()
            .collect())
    }

    fn insert_payment(&self, payment: RentPayment) -> Result<RentPayment, RepositoryError> {
        let mut guard = self.payments.lock().expect("repository mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.invoice_id == payment.invoice_id && existing.kind == payment.kind)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(payment.clone());
        Ok(payment)
    }

    fn payments_for_invoice(
        &self,
        invoice: &InvoiceId,
    ) -> Result<Vec<RentPayment>, RepositoryError> {
        let guard = self.payments.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|payment| &payment.invoice_id == invoice)
            .cloned()
            .collect())
    }

    fn record_outbox(&self, outbox: SettlementOutbox) -> Result<(), RepositoryError> {
        let mut guard = self.outbox.lock().expect("repository mutex poisoned");
        guard.insert(outbox.event.invoice_id.clone(), outbox);
        Ok(())
    }

    fn update_outbox(&self, outbox: SettlementOutbox) -> Result<(), RepositoryError> {
        let mut guard = self.outbox.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&outbox.event.invoice_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(outbox.event.invoice_id.clone(), outbox);
        Ok(())
    }

    fn fetch_outbox(
        &self,
        invoice: &InvoiceId,
    ) -> Result<Option<SettlementOutbox>, RepositoryError> {
        let guard = self.outbox.lock().expect("repository mutex poisoned");
        Ok(guard.get(invoice).cloned())
    }

    fn outbox_with_pending(&self) -> Result<Vec<SettlementOutbox>, RepositoryError> {
        let guard = self.outbox.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|outbox| !outbox.pending.is_empty())
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryMessages {
    records: Arc<Mutex<HashMap<MessageId, TenantMessage>>>,
}

impl MessageRepository for MemoryMessages {
    fn insert(&self, message: TenantMessage) -> Result<TenantMessage, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&message.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(message.id.clone(), message.clone());
        Ok(message)
    }

    fn update(&self, message: TenantMessage) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&message.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(message.id.clone(), message);
        Ok(())
    }

    fn fetch(&self, id: &MessageId) -> Result<Option<TenantMessage>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_landlord(&self, landlord_id: &str) -> Result<Vec<TenantMessage>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|message| message.landlord_id == landlord_id)
            .cloned()
            .collect())
    }
}

/// Email-keyed lookup table with find-or-create semantics.
#[derive(Default, Clone)]
pub struct MemoryDirectory {
    profiles: Arc<Mutex<HashMap<RenterId, RenterProfile>>>,
    by_email: Arc<Mutex<HashMap<String, RenterId>>>,
    sequence: Arc<AtomicU64>,
}

impl RenterDirectory for MemoryDirectory {
    fn resolve(&self, email: &str) -> Result<RenterId, RepositoryError> {
        let key = email.trim().to_lowercase();
        let mut emails = self.by_email.lock().expect("repository mutex poisoned");
        if let Some(id) = emails.get(&key) {
            return Ok(id.clone());
        }

        let id = RenterId(format!(
            "rtr-{:06}",
            self.sequence.fetch_add(1, Ordering::Relaxed) + 1
        ));
        emails.insert(key.clone(), id.clone());
        self.profiles
            .lock()
            .expect("repository mutex poisoned")
            .insert(id.clone(), RenterProfile::new(id.clone(), key));
        Ok(id)
    }

    fn profile(&self, id: &RenterId) -> Result<Option<RenterProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert_profile(&self, profile: RenterProfile) -> Result<(), RepositoryError> {
        let mut emails = self.by_email.lock().expect("repository mutex poisoned");
        emails.insert(profile.email.trim().to_lowercase(), profile.renter_id.clone());
        let mut guard = self.profiles.lock().expect("repository mutex poisoned");
        guard.insert(profile.renter_id.clone(), profile);
        Ok(())
    }

    fn set_current_property(
        &self,
        id: &RenterId,
        property: PropertyId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("repository mutex poisoned");
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.current_property = Some(property);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_resolve_is_find_or_create() {
        let directory = MemoryDirectory::default();
        let first = directory.resolve("Renter@Example.com").expect("resolves");
        let second = directory.resolve("renter@example.com ").expect("resolves");
        assert_eq!(first, second);

        let profile = directory
            .profile(&first)
            .expect("fetch")
            .expect("profile created");
        assert_eq!(profile.email, "renter@example.com");
    }

    #[test]
    fn board_enforces_one_row_per_pair() {
        use crate::workflows::board::domain::{RenterStage, RenterStatusRecord};
        use chrono::Utc;

        let board = MemoryBoard::default();
        let record = RenterStatusRecord {
            id: "rs-900001".to_string(),
            property_id: PropertyId("prop-900001".to_string()),
            landlord_id: "landlord-9".to_string(),
            renter_id: RenterId("rtr-900001".to_string()),
            stage: RenterStage::Invite,
            lease_id: None,
            notes: None,
            updated_at: Utc::now(),
        };

        board.insert(record.clone()).expect("first insert");
        assert!(matches!(
            board.insert(record),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn billing_rejects_duplicate_payment_components() {
        use crate::workflows::billing::domain::{
            PaymentId, PaymentKind, PaymentMethod, PaymentStatus,
        };
        use chrono::NaiveDate;

        let billing = MemoryBilling::default();
        let payment = RentPayment {
            id: PaymentId("pay-900001".to_string()),
            invoice_id: InvoiceId("invc-900001".to_string()),
            amount: 2000,
            kind: PaymentKind::MonthlyRent,
            due_on: NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date"),
            paid_on: None,
            status: PaymentStatus::Paid,
            method: PaymentMethod::Card,
            transaction_id: "txn-1".to_string(),
        };

        billing.insert_payment(payment.clone()).expect("first insert");
        let duplicate = RentPayment {
            id: PaymentId("pay-900002".to_string()),
            ..payment
        };
        assert!(matches!(
            billing.insert_payment(duplicate),
            Err(RepositoryError::Conflict)
        ));
    }
}
