//! The standard settlement projections. Each is independently retryable and
//! idempotent; together they replace the old sequential best-effort fan-out.

use std::fmt::Display;
use std::sync::Arc;

use tracing::warn;

use super::domain::PaymentSettled;
use super::settlement::{ProjectionError, SettlementProjection};
use crate::workflows::board::domain::RenterStage;
use crate::workflows::board::service::StatusBoard;
use crate::workflows::identity::RenterDirectory;
use crate::workflows::leases::domain::{LeaseDocument, LeaseStatus, SignatureStatus};
use crate::workflows::leases::repository::LeaseRepository;
use crate::workflows::leases::service::next_lease_id;
use crate::workflows::notices::domain::{NoticeDraft, NoticeKind};
use crate::workflows::notices::service::NoticeSink;
use crate::workflows::properties::domain::PropertyStatus;
use crate::workflows::properties::repository::PropertyRepository;

fn project_err(error: impl Display) -> ProjectionError {
    ProjectionError(error.to_string())
}

/// Build the full projection set in its standard order.
pub fn standard_projections(
    leases: Arc<dyn LeaseRepository>,
    properties: Arc<dyn PropertyRepository>,
    directory: Arc<dyn RenterDirectory>,
    board: Arc<dyn StatusBoard>,
    notices: Arc<dyn NoticeSink>,
) -> Vec<Arc<dyn SettlementProjection>> {
    vec![
        Arc::new(LeaseActivationProjection { leases }),
        Arc::new(OccupancyProjection {
            properties,
            directory,
        }),
        Arc::new(BoardStageProjection { board }),
        Arc::new(NoticeFanoutProjection { notices }),
    ]
}

/// Find the accepted lease for the pair and activate it, or record a direct
/// activation when payment arrives with no document on file.
pub struct LeaseActivationProjection {
    pub leases: Arc<dyn LeaseRepository>,
}

impl SettlementProjection for LeaseActivationProjection {
    fn key(&self) -> &'static str {
        "lease_activation"
    }

    fn apply(&self, event: &PaymentSettled) -> Result<(), ProjectionError> {
        let documents = self
            .leases
            .for_parties(&event.property_id, &event.renter_id)
            .map_err(project_err)?;

        if documents
            .iter()
            .any(|document| document.status == LeaseStatus::Active)
        {
            return Ok(());
        }

        if let Some(mut accepted) = documents
            .into_iter()
            .find(|document| document.status == LeaseStatus::Accepted)
        {
            accepted
                .transition(LeaseStatus::Active, event.settled_at)
                .map_err(project_err)?;
            self.leases.update(accepted).map_err(project_err)?;
            return Ok(());
        }

        let direct = LeaseDocument {
            id: next_lease_id(),
            property_id: event.property_id.clone(),
            landlord_id: event.landlord_id.clone(),
            renter_id: event.renter_id.clone(),
            renter_email: event.renter_email.clone(),
            template_name: "direct-activation".to_string(),
            original_template_url: String::new(),
            filled_pdf_url: String::new(),
            status: LeaseStatus::Active,
            signature: SignatureStatus {
                landlord_signed: true,
                renter_signed: true,
                co_signer_required: false,
                co_signer_signed: false,
                completed_at: Some(event.settled_at),
            },
            sent_at: None,
            renter_completed_at: None,
            decided_at: Some(event.settled_at),
        };
        self.leases.insert(direct).map_err(project_err)?;
        Ok(())
    }
}

/// Mark the property occupied and point the renter's profile at it.
pub struct OccupancyProjection {
    pub properties: Arc<dyn PropertyRepository>,
    pub directory: Arc<dyn RenterDirectory>,
}

impl SettlementProjection for OccupancyProjection {
    fn key(&self) -> &'static str {
        "occupancy"
    }

    fn apply(&self, event: &PaymentSettled) -> Result<(), ProjectionError> {
        let mut property = self
            .properties
            .fetch(&event.property_id)
            .map_err(project_err)?
            .ok_or_else(|| ProjectionError("property vanished before occupancy".to_string()))?;

        if property.status != PropertyStatus::Occupied {
            property.status = PropertyStatus::Occupied;
            self.properties.update(property).map_err(project_err)?;
        }

        self.directory
            .set_current_property(&event.renter_id, event.property_id.clone())
            .map_err(project_err)?;
        Ok(())
    }
}

/// Advance the board row to `Leased`.
pub struct BoardStageProjection {
    pub board: Arc<dyn StatusBoard>,
}

impl SettlementProjection for BoardStageProjection {
    fn key(&self) -> &'static str {
        "board_stage"
    }

    fn apply(&self, event: &PaymentSettled) -> Result<(), ProjectionError> {
        let stage = self
            .board
            .stage_of(&event.property_id, &event.renter_id)
            .map_err(project_err)?;

        match stage {
            Some(RenterStage::Leased) | None => Ok(()),
            Some(RenterStage::Payment) => {
                self.board
                    .advance(
                        &event.property_id,
                        &event.renter_id,
                        RenterStage::Leased,
                        event.settled_at,
                    )
                    .map_err(project_err)?;
                Ok(())
            }
            // Payment landed before the invoice step advanced the row.
            Some(RenterStage::Accepted) => {
                self.board
                    .advance(
                        &event.property_id,
                        &event.renter_id,
                        RenterStage::Payment,
                        event.settled_at,
                    )
                    .map_err(project_err)?;
                self.board
                    .advance(
                        &event.property_id,
                        &event.renter_id,
                        RenterStage::Leased,
                        event.settled_at,
                    )
                    .map_err(project_err)?;
                Ok(())
            }
            Some(other) => {
                warn!(
                    stage = other.label(),
                    invoice = %event.invoice_id.0,
                    "payment settled for a renter outside the payment stage"
                );
                Ok(())
            }
        }
    }
}

/// Tell both parties. Delivery is at-least-once: a retry after a failure
/// between the two publishes can duplicate the first notice.
pub struct NoticeFanoutProjection {
    pub notices: Arc<dyn NoticeSink>,
}

impl SettlementProjection for NoticeFanoutProjection {
    fn key(&self) -> &'static str {
        "notices"
    }

    fn apply(&self, event: &PaymentSettled) -> Result<(), ProjectionError> {
        self.notices
            .publish(
                NoticeDraft::new(
                    NoticeKind::PaymentReceived,
                    "Payment received",
                    format!(
                        "{} paid invoice {} (${}).",
                        event.renter_email, event.invoice_id.0, event.amount
                    ),
                    &event.landlord_id,
                    event.property_id.clone(),
                    event.renter_id.clone(),
                )
                .about_invoice(event.invoice_id.clone()),
                event.settled_at,
            )
            .map_err(project_err)?;

        self.notices
            .publish(
                NoticeDraft::new(
                    NoticeKind::PaymentSuccessful,
                    "Payment successful",
                    format!(
                        "Your payment of ${} for invoice {} went through.",
                        event.amount, event.invoice_id.0
                    ),
                    &event.landlord_id,
                    event.property_id.clone(),
                    event.renter_id.clone(),
                )
                .about_invoice(event.invoice_id.clone()),
                event.settled_at,
            )
            .map_err(project_err)?;

        Ok(())
    }
}
