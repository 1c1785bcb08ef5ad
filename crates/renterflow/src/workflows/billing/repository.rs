use super::domain::{Invoice, InvoiceId, RentPayment, SettlementOutbox};
use crate::workflows::RepositoryError;

/// Storage abstraction over the `invoices`, `payments`, and settlement
/// outbox collections. Payment inserts must reject a duplicate
/// (invoice, kind) pair with `Conflict` so settlement fan-out stays
/// idempotent.
pub trait BillingRepository: Send + Sync {
    fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice, RepositoryError>;
    fn update_invoice(&self, invoice: Invoice) -> Result<(), RepositoryError>;
    fn fetch_invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError>;
    fn invoices_for_landlord(&self, landlord_id: &str) -> Result<Vec<Invoice>, RepositoryError>;
    /// Invoices still awaiting payment (`Sent`), for the overdue sweep.
    fn open_invoices(&self) -> Result<Vec<Invoice>, RepositoryError>;

    fn insert_payment(&self, payment: RentPayment) -> Result<RentPayment, RepositoryError>;
    fn payments_for_invoice(
        &self,
        invoice: &InvoiceId,
    ) -> Result<Vec<RentPayment>, RepositoryError>;

    fn record_outbox(&self, outbox: SettlementOutbox) -> Result<(), RepositoryError>;
    fn update_outbox(&self, outbox: SettlementOutbox) -> Result<(), RepositoryError>;
    fn fetch_outbox(&self, invoice: &InvoiceId)
        -> Result<Option<SettlementOutbox>, RepositoryError>;
    fn outbox_with_pending(&self) -> Result<Vec<SettlementOutbox>, RepositoryError>;
}
