use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::identity::RenterId;
use crate::workflows::leases::domain::LeaseId;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::RepositoryError;

/// Progression of one (property, renter) relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenterStage {
    Invite,
    Application,
    Lease,
    LeaseRejected,
    Accepted,
    Payment,
    Leased,
}

impl RenterStage {
    pub const fn label(self) -> &'static str {
        match self {
            RenterStage::Invite => "invite",
            RenterStage::Application => "application",
            RenterStage::Lease => "lease",
            RenterStage::LeaseRejected => "lease_rejected",
            RenterStage::Accepted => "accepted",
            RenterStage::Payment => "payment",
            RenterStage::Leased => "leased",
        }
    }

    /// The legal forward moves. `LeaseRejected -> Lease` covers a landlord
    /// sending a revised lease after rejecting the first submission.
    pub fn can_advance_to(self, next: RenterStage) -> bool {
        matches!(
            (self, next),
            (RenterStage::Invite, RenterStage::Application)
                | (RenterStage::Application, RenterStage::Lease)
                | (RenterStage::Lease, RenterStage::Accepted)
                | (RenterStage::Lease, RenterStage::LeaseRejected)
                | (RenterStage::LeaseRejected, RenterStage::Lease)
                | (RenterStage::Accepted, RenterStage::Payment)
                | (RenterStage::Payment, RenterStage::Leased)
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("renter status not found for this property and renter")]
    NotFound,
    #[error("renter already tracked for this property")]
    AlreadyTracked,
    #[error("invalid stage transition from {from} to {to}")]
    InvalidStage {
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One board row. The repository enforces at most one row per
/// (property, renter) pair; the stage only moves through `advance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenterStatusRecord {
    pub id: String,
    pub property_id: PropertyId,
    pub landlord_id: String,
    pub renter_id: RenterId,
    pub stage: RenterStage,
    pub lease_id: Option<LeaseId>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RenterStatusRecord {
    pub fn advance(&mut self, next: RenterStage, at: DateTime<Utc>) -> Result<(), BoardError> {
        if !self.stage.can_advance_to(next) {
            return Err(BoardError::InvalidStage {
                from: self.stage.label(),
                to: next.label(),
            });
        }
        self.stage = next;
        self.updated_at = at;
        Ok(())
    }

    pub fn to_view(&self) -> BoardRowView {
        BoardRowView {
            property_id: self.property_id.clone(),
            renter_id: self.renter_id.clone(),
            stage: self.stage,
            stage_label: self.stage.label(),
            lease_id: self.lease_id.clone(),
            offered_actions: offered_actions(self.stage),
            updated_at: self.updated_at,
        }
    }
}

/// Lease review actions are offered exactly while the row sits at `Lease`;
/// after a decision the stage has moved and the actions disappear.
fn offered_actions(stage: RenterStage) -> Vec<&'static str> {
    match stage {
        RenterStage::Lease => vec!["accept_lease", "reject_lease"],
        _ => Vec::new(),
    }
}

/// Row projection for board screens.
#[derive(Debug, Clone, Serialize)]
pub struct BoardRowView {
    pub property_id: PropertyId,
    pub renter_id: RenterId,
    pub stage: RenterStage,
    pub stage_label: &'static str,
    pub lease_id: Option<LeaseId>,
    pub offered_actions: Vec<&'static str>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stage: RenterStage) -> RenterStatusRecord {
        RenterStatusRecord {
            id: "rs-000001".to_string(),
            property_id: PropertyId("prop-000001".to_string()),
            landlord_id: "landlord-1".to_string(),
            renter_id: RenterId("rtr-000001".to_string()),
            stage,
            lease_id: None,
            notes: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn happy_path_advances_in_order() {
        let mut row = record(RenterStage::Invite);
        for next in [
            RenterStage::Application,
            RenterStage::Lease,
            RenterStage::Accepted,
            RenterStage::Payment,
            RenterStage::Leased,
        ] {
            row.advance(next, Utc::now()).expect("legal transition");
        }
        assert_eq!(row.stage, RenterStage::Leased);
    }

    #[test]
    fn rejected_lease_can_be_resent() {
        let mut row = record(RenterStage::Lease);
        row.advance(RenterStage::LeaseRejected, Utc::now())
            .expect("reject");
        row.advance(RenterStage::Lease, Utc::now()).expect("re-send");
        assert_eq!(row.stage, RenterStage::Lease);
    }

    #[test]
    fn backward_and_skipping_moves_are_rejected() {
        let mut row = record(RenterStage::Leased);
        assert!(matches!(
            row.advance(RenterStage::Invite, Utc::now()),
            Err(BoardError::InvalidStage { .. })
        ));

        let mut row = record(RenterStage::Invite);
        assert!(matches!(
            row.advance(RenterStage::Leased, Utc::now()),
            Err(BoardError::InvalidStage { .. })
        ));
    }

    #[test]
    fn lease_actions_offered_only_at_lease_stage() {
        let offered = record(RenterStage::Lease).to_view().offered_actions;
        assert_eq!(offered, vec!["accept_lease", "reject_lease"]);

        for stage in [
            RenterStage::Invite,
            RenterStage::Application,
            RenterStage::LeaseRejected,
            RenterStage::Accepted,
            RenterStage::Payment,
            RenterStage::Leased,
        ] {
            assert!(record(stage).to_view().offered_actions.is_empty());
        }
    }
}
