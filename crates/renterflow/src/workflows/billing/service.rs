use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::domain::{
    BillingError, Invoice, InvoiceBreakdown, InvoiceId, InvoiceStatus, PropertySnapshot,
    RentPayment,
};
use super::repository::BillingRepository;
use crate::workflows::board::domain::RenterStage;
use crate::workflows::board::service::StatusBoard;
use crate::workflows::identity::RenterDirectory;
use crate::workflows::notices::domain::{NoticeDraft, NoticeKind};
use crate::workflows::notices::service::NoticeSink;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::repository::PropertyRepository;
use crate::workflows::properties::service::fetch_owned;

static INVOICE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_invoice_id() -> InvoiceId {
    let id = INVOICE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InvoiceId(format!("invc-{id:06}"))
}

/// Intake shape for issuing an invoice.
#[derive(Debug, Clone)]
pub struct IssueInvoice {
    pub property_id: PropertyId,
    pub landlord_id: String,
    pub renter_email: String,
    pub include_pet_fee: bool,
    pub notes: Option<String>,
    pub due_on: NaiveDate,
}

/// Service owning invoice issuance and lifecycle short of settlement.
pub struct BillingService<R> {
    repository: Arc<R>,
    properties: Arc<dyn PropertyRepository>,
    directory: Arc<dyn RenterDirectory>,
    notices: Arc<dyn NoticeSink>,
    board: Arc<dyn StatusBoard>,
}

impl<R> BillingService<R>
where
    R: BillingRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        properties: Arc<dyn PropertyRepository>,
        directory: Arc<dyn RenterDirectory>,
        notices: Arc<dyn NoticeSink>,
        board: Arc<dyn StatusBoard>,
    ) -> Self {
        Self {
            repository,
            properties,
            directory,
            notices,
            board,
        }
    }

    /// Price an invoice for a property without persisting anything.
    pub fn quote(
        &self,
        property_id: &PropertyId,
        landlord_id: &str,
        include_pet_fee: bool,
    ) -> Result<InvoiceBreakdown, BillingError> {
        let property = fetch_owned(self.properties.as_ref(), property_id, landlord_id)?;
        Ok(InvoiceBreakdown::from_property(&property, include_pet_fee))
    }

    /// Persist the invoice as `Sent` with a pricing snapshot, notify the
    /// renter, and move the board row from `Accepted` to `Payment` when the
    /// renter is at that point of the lifecycle.
    pub fn issue(&self, intake: IssueInvoice, at: DateTime<Utc>) -> Result<Invoice, BillingError> {
        let property = fetch_owned(self.properties.as_ref(), &intake.property_id, &intake.landlord_id)?;
        let renter = self.directory.resolve(&intake.renter_email)?;

        let breakdown = InvoiceBreakdown::from_property(&property, intake.include_pet_fee);
        let invoice = Invoice {
            id: next_invoice_id(),
            landlord_id: intake.landlord_id.clone(),
            property_id: intake.property_id.clone(),
            renter_id: renter.clone(),
            renter_email: intake.renter_email.clone(),
            amount: breakdown.total(),
            breakdown,
            status: InvoiceStatus::Sent,
            property: PropertySnapshot::of(&property),
            notes: intake.notes,
            due_on: intake.due_on,
            created_at: at,
        };
        let stored = self.repository.insert_invoice(invoice)?;

        if self.board.stage_of(&intake.property_id, &renter)? == Some(RenterStage::Accepted) {
            self.board
                .advance(&intake.property_id, &renter, RenterStage::Payment, at)?;
        }

        self.notices.publish(
            NoticeDraft::new(
                NoticeKind::InvoiceSent,
                "Invoice issued",
                format!(
                    "An invoice of ${} for {} is due on {}.",
                    stored.amount,
                    property.address.line(),
                    stored.due_on
                ),
                &intake.landlord_id,
                intake.property_id.clone(),
                renter,
            )
            .about_invoice(stored.id.clone()),
            at,
        )?;

        info!(invoice = %stored.id.0, amount = stored.amount, "invoice issued");
        Ok(stored)
    }

    pub fn cancel(&self, id: &InvoiceId, landlord_id: &str) -> Result<Invoice, BillingError> {
        let mut invoice = self.fetch_owned_invoice(id, landlord_id)?;
        invoice.transition(InvoiceStatus::Cancelled)?;
        self.repository.update_invoice(invoice.clone())?;
        Ok(invoice)
    }

    /// Flip sent invoices past their due date to `Overdue`.
    pub fn sweep_overdue(&self, today: NaiveDate) -> Result<usize, BillingError> {
        let mut swept = 0;
        for mut invoice in self.repository.open_invoices()? {
            if invoice.due_on < today {
                invoice.transition(InvoiceStatus::Overdue)?;
                self.repository.update_invoice(invoice)?;
                swept += 1;
            }
        }
        if swept > 0 {
            info!(swept, "marked overdue invoices");
        }
        Ok(swept)
    }

    pub fn get(&self, id: &InvoiceId) -> Result<Invoice, BillingError> {
        self.repository
            .fetch_invoice(id)?
            .ok_or(BillingError::NotFound)
    }

    pub fn list_for_landlord(&self, landlord_id: &str) -> Result<Vec<Invoice>, BillingError> {
        Ok(self.repository.invoices_for_landlord(landlord_id)?)
    }

    pub fn payments(&self, id: &InvoiceId) -> Result<Vec<RentPayment>, BillingError> {
        Ok(self.repository.payments_for_invoice(id)?)
    }

    fn fetch_owned_invoice(
        &self,
        id: &InvoiceId,
        landlord_id: &str,
    ) -> Result<Invoice, BillingError> {
        let invoice = self
            .repository
            .fetch_invoice(id)?
            .ok_or(BillingError::NotFound)?;
        if invoice.landlord_id != landlord_id {
            return Err(BillingError::AccessDenied);
        }
        Ok(invoice)
    }
}
