use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{BoardError, BoardRowView, RenterStage, RenterStatusRecord};
use super::repository::RenterStatusRepository;
use crate::workflows::identity::RenterId;
use crate::workflows::leases::domain::LeaseId;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::RepositoryError;

static STATUS_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_status_id() -> String {
    let id = STATUS_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("rs-{id:06}")
}

/// Seam the other workflows move renters through. Implemented by
/// [`BoardService`]; every stage change funnels through the transition table.
pub trait StatusBoard: Send + Sync {
    /// Start tracking a renter for a property at stage `Invite`.
    fn open(
        &self,
        property: &PropertyId,
        landlord_id: &str,
        renter: &RenterId,
        at: DateTime<Utc>,
    ) -> Result<RenterStatusRecord, BoardError>;

    fn advance(
        &self,
        property: &PropertyId,
        renter: &RenterId,
        stage: RenterStage,
        at: DateTime<Utc>,
    ) -> Result<RenterStatusRecord, BoardError>;

    fn stage_of(
        &self,
        property: &PropertyId,
        renter: &RenterId,
    ) -> Result<Option<RenterStage>, BoardError>;

    fn attach_lease(
        &self,
        property: &PropertyId,
        renter: &RenterId,
        lease: LeaseId,
    ) -> Result<(), BoardError>;
}

/// Service owning the status board rows.
pub struct BoardService<R> {
    repository: Arc<R>,
}

impl<R> BoardService<R>
where
    R: RenterStatusRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn board_for_property(
        &self,
        property: &PropertyId,
    ) -> Result<Vec<BoardRowView>, BoardError> {
        let mut rows = self.repository.for_property(property)?;
        rows.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        Ok(rows.iter().map(RenterStatusRecord::to_view).collect())
    }

    fn fetch_required(
        &self,
        property: &PropertyId,
        renter: &RenterId,
    ) -> Result<RenterStatusRecord, BoardError> {
        self.repository
            .fetch(property, renter)?
            .ok_or(BoardError::NotFound)
    }
}

impl<R> StatusBoard for BoardService<R>
where
    R: RenterStatusRepository + 'static,
{
    fn open(
        &self,
        property: &PropertyId,
        landlord_id: &str,
        renter: &RenterId,
        at: DateTime<Utc>,
    ) -> Result<RenterStatusRecord, BoardError> {
        let record = RenterStatusRecord {
            id: next_status_id(),
            property_id: property.clone(),
            landlord_id: landlord_id.to_string(),
            renter_id: renter.clone(),
            stage: RenterStage::Invite,
            lease_id: None,
            notes: None,
            updated_at: at,
        };

        match self.repository.insert(record) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => Err(BoardError::AlreadyTracked),
            Err(other) => Err(other.into()),
        }
    }

    fn advance(
        &self,
        property: &PropertyId,
        renter: &RenterId,
        stage: RenterStage,
        at: DateTime<Utc>,
    ) -> Result<RenterStatusRecord, BoardError> {
        let mut record = self.fetch_required(property, renter)?;
        record.advance(stage, at)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    fn stage_of(
        &self,
        property: &PropertyId,
        renter: &RenterId,
    ) -> Result<Option<RenterStage>, BoardError> {
        Ok(self
            .repository
            .fetch(property, renter)?
            .map(|record| record.stage))
    }

    fn attach_lease(
        &self,
        property: &PropertyId,
        renter: &RenterId,
        lease: LeaseId,
    ) -> Result<(), BoardError> {
        let mut record = self.fetch_required(property, renter)?;
        record.lease_id = Some(lease);
        self.repository.update(record)?;
        Ok(())
    }
}
