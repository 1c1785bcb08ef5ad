//! Settlement scenarios: breakdown fan-out, idempotent re-settlement, and
//! replay of projections a partial failure left pending.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Duration;
use common::{at, portal, sample_property, TestPortal, LANDLORD, RENTER_EMAIL};

use renterflow::workflows::billing::{
    Invoice, InvoiceStatus, IssueInvoice, PaymentKind, PaymentMethod, PaymentSettled,
    ProjectionError, SettlementProjection,
};
use renterflow::workflows::board::StatusBoard;
use renterflow::workflows::identity::RenterDirectory;
use renterflow::workflows::leases::{LeaseRepository, LeaseStatus};
use renterflow::workflows::properties::{PropertyRepository, PropertyStatus};

fn issued_invoice(portal: &TestPortal, include_pet_fee: bool) -> Invoice {
    let property = portal
        .properties
        .register(sample_property(LANDLORD))
        .expect("property registers");
    portal
        .billing
        .issue(
            IssueInvoice {
                property_id: property.id.clone(),
                landlord_id: LANDLORD.to_string(),
                renter_email: RENTER_EMAIL.to_string(),
                include_pet_fee,
                notes: None,
                due_on: at(5, 0).date_naive() + Duration::days(14),
            },
            at(5, 9),
        )
        .expect("invoice issues")
}

/// Delegates to the real projection after failing a fixed number of times.
struct FailingOnce {
    inner: Arc<dyn SettlementProjection>,
    remaining: AtomicUsize,
}

impl SettlementProjection for FailingOnce {
    fn key(&self) -> &'static str {
        self.inner.key()
    }

    fn apply(&self, event: &PaymentSettled) -> Result<(), ProjectionError> {
        if self.remaining.load(Ordering::SeqCst) > 0 {
            self.remaining.fetch_sub(1, Ordering::SeqCst);
            return Err(ProjectionError("injected failure".to_string()));
        }
        self.inner.apply(event)
    }
}

#[test]
fn settle_fans_out_the_breakdown() {
    let portal = portal();
    let invoice = issued_invoice(&portal, true);
    assert_eq!(invoice.amount, 2000 + 500 + 40);

    let outcome = portal
        .settlement
        .settle(&invoice.id, PaymentMethod::Card, "txn-0002", at(6, 9))
        .expect("settles");

    assert!(outcome.newly_settled);
    assert_eq!(outcome.invoice.status, InvoiceStatus::Paid);
    let mut kinds: Vec<(PaymentKind, u32)> = outcome
        .payments
        .iter()
        .map(|payment| (payment.kind, payment.amount))
        .collect();
    kinds.sort_by_key(|(kind, _)| kind.label());
    assert_eq!(
        kinds,
        vec![
            (PaymentKind::MonthlyRent, 2000),
            (PaymentKind::PetFee, 40),
            (PaymentKind::SecurityDeposit, 500),
        ]
    );
}

#[test]
fn settling_twice_is_a_no_op() {
    let portal = portal();
    let invoice = issued_invoice(&portal, false);
    let renter = portal.directory.resolve(RENTER_EMAIL).expect("renter id");

    let first = portal
        .settlement
        .settle(&invoice.id, PaymentMethod::Card, "txn-0003", at(6, 9))
        .expect("first settle");
    assert!(first.newly_settled);

    let second = portal
        .settlement
        .settle(&invoice.id, PaymentMethod::Card, "txn-0003", at(6, 10))
        .expect("second settle");
    assert!(!second.newly_settled);
    assert_eq!(second.payments.len(), first.payments.len());

    let successes = portal
        .notices
        .renter_inbox(&renter)
        .expect("inbox")
        .into_iter()
        .filter(|notice| {
            notice.kind == renterflow::workflows::notices::NoticeKind::PaymentSuccessful
        })
        .count();
    assert_eq!(successes, 1, "no duplicate payment notices");
}

#[test]
fn replay_completes_projections_left_pending() {
    let portal = portal();
    let invoice = issued_invoice(&portal, false);
    let renter = portal.directory.resolve(RENTER_EMAIL).expect("renter id");

    // Wrap the occupancy projection so its first application fails.
    let projections = portal
        .standard_projections()
        .into_iter()
        .map(|projection| {
            if projection.key() == "occupancy" {
                Arc::new(FailingOnce {
                    inner: projection,
                    remaining: AtomicUsize::new(1),
                }) as Arc<dyn SettlementProjection>
            } else {
                projection
            }
        })
        .collect();
    let settlement = portal.settlement_with(projections);

    let outcome = settlement
        .settle(&invoice.id, PaymentMethod::Card, "txn-0004", at(6, 9))
        .expect("settles despite projection failure");
    assert!(outcome.newly_settled);
    assert_eq!(outcome.pending_projections, vec!["occupancy".to_string()]);
    assert_eq!(outcome.invoice.status, InvoiceStatus::Paid);

    // The failure left the property unoccupied.
    let stored = portal
        .property_repo
        .fetch(&invoice.property_id)
        .expect("fetch")
        .expect("property present");
    assert_eq!(stored.status, PropertyStatus::Available);

    let drained = settlement.replay_incomplete().expect("replay");
    assert_eq!(drained, 1);

    let stored = portal
        .property_repo
        .fetch(&invoice.property_id)
        .expect("fetch")
        .expect("property present");
    assert_eq!(stored.status, PropertyStatus::Occupied);
    let profile = portal
        .directory
        .profile(&renter)
        .expect("fetch")
        .expect("profile present");
    assert_eq!(profile.current_property, Some(invoice.property_id.clone()));

    // Nothing left to drain.
    assert_eq!(settlement.replay_incomplete().expect("replay"), 0);
}

#[test]
fn settlement_activates_a_direct_lease_when_none_exists() {
    let portal = portal();
    let invoice = issued_invoice(&portal, false);
    let renter = portal.directory.resolve(RENTER_EMAIL).expect("renter id");

    portal
        .settlement
        .settle(&invoice.id, PaymentMethod::BankTransfer, "txn-0005", at(6, 9))
        .expect("settles");

    let documents = portal
        .lease_repo
        .for_parties(&invoice.property_id, &renter)
        .expect("lease query");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].status, LeaseStatus::Active);
    assert!(documents[0].signature.is_complete());

    // Board never tracked this renter, so the stage projection is a no-op.
    assert_eq!(
        portal
            .board
            .stage_of(&invoice.property_id, &renter)
            .expect("stage"),
        None
    );
}

#[test]
fn overdue_invoices_sweep_and_still_settle() {
    let portal = portal();
    let invoice = issued_invoice(&portal, false);

    let swept = portal
        .billing
        .sweep_overdue(invoice.due_on + Duration::days(1))
        .expect("sweep");
    assert_eq!(swept, 1);
    assert_eq!(
        portal.billing.get(&invoice.id).expect("fetch").status,
        InvoiceStatus::Overdue
    );

    let outcome = portal
        .settlement
        .settle(&invoice.id, PaymentMethod::Check, "txn-0006", at(25, 9))
        .expect("late payment settles");
    assert!(outcome.newly_settled);
    assert_eq!(outcome.invoice.status, InvoiceStatus::Paid);
}
