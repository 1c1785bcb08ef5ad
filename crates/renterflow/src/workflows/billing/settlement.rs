//! Idempotent settlement of a paid invoice.
//!
//! Marking the invoice paid, fanning the breakdown into payment records, and
//! recording one `PaymentSettled` outbox event happen first; independent
//! projections (lease activation, occupancy, board stage, notices) then
//! consume the event. A projection that fails stays pending on the outbox row
//! and is re-run by `replay_incomplete`, so a paid invoice can never
//! permanently lack its downstream effects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    BillingError, Invoice, InvoiceId, InvoiceStatus, PaymentId, PaymentMethod, PaymentSettled,
    PaymentStatus, RentPayment, SettlementOutbox,
};
use super::repository::BillingRepository;
use crate::workflows::RepositoryError;

static PAYMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_payment_id() -> PaymentId {
    let id = PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PaymentId(format!("pay-{id:06}"))
}

#[derive(Debug, thiserror::Error)]
#[error("projection failed: {0}")]
pub struct ProjectionError(pub String);

/// One independent consumer of the settlement event. Implementations must be
/// idempotent: re-applying an event already absorbed is a no-op.
pub trait SettlementProjection: Send + Sync {
    fn key(&self) -> &'static str;
    fn apply(&self, event: &PaymentSettled) -> Result<(), ProjectionError>;
}

/// What a settle call produced.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub invoice: Invoice,
    pub payments: Vec<RentPayment>,
    /// False when the invoice was already paid and this call only replayed
    /// leftover projections.
    pub newly_settled: bool,
    /// Projection keys a failure left pending; empty on a clean settlement.
    pub pending_projections: Vec<String>,
}

/// Drives the paid-invoice fan-out through the outbox.
pub struct SettlementWorkflow<R> {
    repository: Arc<R>,
    projections: Vec<Arc<dyn SettlementProjection>>,
}

impl<R> SettlementWorkflow<R>
where
    R: BillingRepository + 'static,
{
    pub fn new(repository: Arc<R>, projections: Vec<Arc<dyn SettlementProjection>>) -> Self {
        Self {
            repository,
            projections,
        }
    }

    /// Settle an invoice after the payment gateway confirms the charge.
    /// Calling this twice for the same invoice is a no-op beyond finishing
    /// any projections an earlier partial failure left behind.
    pub fn settle(
        &self,
        id: &InvoiceId,
        method: PaymentMethod,
        transaction_id: &str,
        at: DateTime<Utc>,
    ) -> Result<SettlementOutcome, BillingError> {
        let mut invoice = self
            .repository
            .fetch_invoice(id)?
            .ok_or(BillingError::NotFound)?;

        if invoice.status == InvoiceStatus::Paid {
            let pending = match self.repository.fetch_outbox(id)? {
                Some(mut outbox) => {
                    self.run_projections(&mut outbox)?;
                    outbox.pending
                }
                None => Vec::new(),
            };
            return Ok(SettlementOutcome {
                payments: self.repository.payments_for_invoice(id)?,
                invoice,
                newly_settled: false,
                pending_projections: pending,
            });
        }

        invoice.transition(InvoiceStatus::Paid)?;
        self.repository.update_invoice(invoice.clone())?;

        for (kind, amount) in invoice.breakdown.components() {
            let payment = RentPayment {
                id: next_payment_id(),
                invoice_id: invoice.id.clone(),
                amount,
                kind,
                due_on: invoice.due_on,
                paid_on: Some(at.date_naive()),
                status: PaymentStatus::Paid,
                method,
                transaction_id: transaction_id.to_string(),
            };
            match self.repository.insert_payment(payment) {
                Ok(_) => {}
                // A retry after a crash mid-fan-out; the component row is
                // already there.
                Err(RepositoryError::Conflict) => {}
                Err(other) => return Err(other.into()),
            }
        }

        let mut outbox = SettlementOutbox {
            event: PaymentSettled {
                invoice_id: invoice.id.clone(),
                property_id: invoice.property_id.clone(),
                landlord_id: invoice.landlord_id.clone(),
                renter_id: invoice.renter_id.clone(),
                renter_email: invoice.renter_email.clone(),
                amount: invoice.amount,
                breakdown: invoice.breakdown,
                method,
                transaction_id: transaction_id.to_string(),
                settled_at: at,
            },
            pending: self
                .projections
                .iter()
                .map(|projection| projection.key().to_string())
                .collect(),
            recorded_at: at,
        };
        self.repository.record_outbox(outbox.clone())?;

        self.run_projections(&mut outbox)?;

        info!(
            invoice = %invoice.id.0,
            amount = invoice.amount,
            pending = outbox.pending.len(),
            "invoice settled"
        );

        Ok(SettlementOutcome {
            payments: self.repository.payments_for_invoice(&invoice.id)?,
            invoice,
            newly_settled: true,
            pending_projections: outbox.pending,
        })
    }

    /// Re-run every projection an earlier failure left pending. Returns the
    /// number of outbox rows fully drained by this pass.
    pub fn replay_incomplete(&self) -> Result<usize, BillingError> {
        let mut drained = 0;
        for mut outbox in self.repository.outbox_with_pending()? {
            self.run_projections(&mut outbox)?;
            if outbox.pending.is_empty() {
                drained += 1;
            }
        }
        Ok(drained)
    }

    fn run_projections(&self, outbox: &mut SettlementOutbox) -> Result<(), BillingError> {
        if outbox.pending.is_empty() {
            return Ok(());
        }

        let mut remaining = Vec::new();
        for key in outbox.pending.drain(..) {
            let Some(projection) = self
                .projections
                .iter()
                .find(|projection| projection.key() == key)
            else {
                warn!(key = %key, "no projection registered for pending settlement step");
                remaining.push(key);
                continue;
            };

            match projection.apply(&outbox.event) {
                Ok(()) => {}
                Err(error) => {
                    warn!(key = %key, %error, invoice = %outbox.event.invoice_id.0, "settlement projection failed; left pending");
                    remaining.push(key);
                }
            }
        }
        outbox.pending = remaining;
        self.repository.update_outbox(outbox.clone())?;
        Ok(())
    }
}
