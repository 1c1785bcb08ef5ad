use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{
    LeaseAction, LeaseDocument, LeaseError, LeaseId, LeaseStatus, SignatureStatus,
};
use super::fill::{DocumentFill, LeaseTemplate};
use super::repository::LeaseRepository;
use crate::storage::ObjectStore;
use crate::workflows::board::domain::{BoardError, RenterStage};
use crate::workflows::board::service::StatusBoard;
use crate::workflows::identity::RenterDirectory;
use crate::workflows::notices::domain::{NoticeDraft, NoticeKind};
use crate::workflows::notices::service::NoticeSink;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::repository::PropertyRepository;
use crate::workflows::properties::service::fetch_owned;

static LEASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_lease_id() -> LeaseId {
    let id = LEASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeaseId(format!("lease-{id:06}"))
}

/// A renter's signed upload.
#[derive(Debug, Clone)]
pub struct LeaseUpload {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

/// Service owning the lease document workflow:
/// send -> renter completes -> landlord decides.
pub struct LeaseWorkflow<R> {
    repository: Arc<R>,
    properties: Arc<dyn PropertyRepository>,
    directory: Arc<dyn RenterDirectory>,
    notices: Arc<dyn NoticeSink>,
    board: Arc<dyn StatusBoard>,
    storage: Arc<dyn ObjectStore>,
    fill: Arc<dyn DocumentFill>,
}

impl<R> LeaseWorkflow<R>
where
    R: LeaseRepository + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: Arc<R>,
        properties: Arc<dyn PropertyRepository>,
        directory: Arc<dyn RenterDirectory>,
        notices: Arc<dyn NoticeSink>,
        board: Arc<dyn StatusBoard>,
        storage: Arc<dyn ObjectStore>,
        fill: Arc<dyn DocumentFill>,
    ) -> Self {
        Self {
            repository,
            properties,
            directory,
            notices,
            board,
            storage,
            fill,
        }
    }

    /// Fill the template through the document seam and deliver the lease to
    /// the renter. The board row moves to `Lease`, which is what unlocks the
    /// renter submission and the landlord review actions.
    pub fn send(
        &self,
        template: LeaseTemplate,
        property_id: &PropertyId,
        landlord_id: &str,
        renter_email: &str,
        at: DateTime<Utc>,
    ) -> Result<LeaseDocument, LeaseError> {
        let property = fetch_owned(self.properties.as_ref(), property_id, landlord_id)?;
        let renter = self.directory.resolve(renter_email)?;

        let mut fields = BTreeMap::new();
        fields.insert("property_address".to_string(), property.address.line());
        fields.insert(
            "monthly_rent".to_string(),
            property.monthly_rent.to_string(),
        );
        fields.insert(
            "security_deposit".to_string(),
            property.security_deposit.to_string(),
        );
        fields.insert("renter_email".to_string(), renter_email.to_string());
        if let Some(profile) = self.directory.profile(&renter)? {
            if let Some(name) = profile.full_name {
                fields.insert("renter_name".to_string(), name);
            }
        }

        let filled = self.fill.fill(&template, &fields)?;

        let mut lease = LeaseDocument {
            id: next_lease_id(),
            property_id: property_id.clone(),
            landlord_id: landlord_id.to_string(),
            renter_id: renter.clone(),
            renter_email: renter_email.to_string(),
            template_name: template.name,
            original_template_url: template.url,
            filled_pdf_url: filled.url,
            status: LeaseStatus::Draft,
            signature: SignatureStatus::default(),
            sent_at: None,
            renter_completed_at: None,
            decided_at: None,
        };
        lease.transition(LeaseStatus::Sent, at)?;
        let lease = self.repository.insert(lease)?;

        match self.board.stage_of(property_id, &renter)? {
            None => return Err(BoardError::NotFound.into()),
            // A lease is already out for this pair; the new document simply
            // supersedes it in review.
            Some(RenterStage::Lease) => {}
            Some(_) => {
                self.board
                    .advance(property_id, &renter, RenterStage::Lease, at)?;
            }
        }
        self.board
            .attach_lease(property_id, &renter, lease.id.clone())?;

        self.notices.publish(
            NoticeDraft::new(
                NoticeKind::LeaseReceived,
                "Lease ready to sign",
                format!(
                    "A lease for {} is ready for your review and signature.",
                    property.address.line()
                ),
                landlord_id,
                property_id.clone(),
                renter,
            )
            .about_lease(lease.id.clone()),
            at,
        )?;

        info!(lease = %lease.id.0, property = %property_id.0, "lease sent");
        Ok(lease)
    }

    /// The renter uploads a signed copy. Prior `lease_received` notices for
    /// this lease are marked read so the landlord's lease inbox only carries
    /// the completion.
    pub fn renter_submit(
        &self,
        id: &LeaseId,
        renter_email: &str,
        upload: LeaseUpload,
        at: DateTime<Utc>,
    ) -> Result<LeaseDocument, LeaseError> {
        let mut lease = self.repository.fetch(id)?.ok_or(LeaseError::NotFound)?;
        if !lease.renter_email.eq_ignore_ascii_case(renter_email) {
            return Err(LeaseError::WrongRenter);
        }
        self.require_lease_stage(&lease)?;

        let key = format!("leases/{}/{}", lease.id.0, upload.file_name);
        let stored = self
            .storage
            .put(&key, upload.bytes, &upload.content_type)?;

        lease.transition(LeaseStatus::RenterCompleted, at)?;
        lease.filled_pdf_url = stored.url;
        lease.signature.renter_signed = true;
        self.repository.update(lease.clone())?;

        self.notices
            .mark_lease_notices_read(&lease.id, NoticeKind::LeaseReceived, at)?;
        self.notices.publish(
            NoticeDraft::new(
                NoticeKind::LeaseCompleted,
                "Lease completed by renter",
                format!("{} uploaded a signed lease.", lease.renter_email),
                &lease.landlord_id,
                lease.property_id.clone(),
                lease.renter_id.clone(),
            )
            .about_lease(lease.id.clone()),
            at,
        )?;

        info!(lease = %lease.id.0, "renter completed lease");
        Ok(lease)
    }

    /// Accept or reject the renter-completed lease. Gated on the board row
    /// still sitting at `Lease`, so a second decision cannot land.
    pub fn landlord_decision(
        &self,
        id: &LeaseId,
        landlord_id: &str,
        action: LeaseAction,
        at: DateTime<Utc>,
    ) -> Result<LeaseDocument, LeaseError> {
        let mut lease = self.repository.fetch(id)?.ok_or(LeaseError::NotFound)?;
        fetch_owned(self.properties.as_ref(), &lease.property_id, landlord_id)?;
        self.require_lease_stage(&lease)?;

        let (next, stage) = match action {
            LeaseAction::Accept => (LeaseStatus::Accepted, RenterStage::Accepted),
            LeaseAction::Reject => (LeaseStatus::Rejected, RenterStage::LeaseRejected),
        };
        lease.transition(next, at)?;
        if action == LeaseAction::Accept {
            lease.signature.landlord_signed = true;
            if lease.signature.is_complete() {
                lease.signature.completed_at = Some(at);
            }
        }
        self.repository.update(lease.clone())?;

        self.board
            .advance(&lease.property_id, &lease.renter_id, stage, at)?;

        info!(lease = %lease.id.0, status = lease.status.label(), "landlord decided lease");
        Ok(lease)
    }

    pub fn get(&self, id: &LeaseId) -> Result<LeaseDocument, LeaseError> {
        self.repository.fetch(id)?.ok_or(LeaseError::NotFound)
    }

    pub fn list_for_landlord(&self, landlord_id: &str) -> Result<Vec<LeaseDocument>, LeaseError> {
        Ok(self.repository.for_landlord(landlord_id)?)
    }

    fn require_lease_stage(&self, lease: &LeaseDocument) -> Result<(), LeaseError> {
        let stage = self
            .board
            .stage_of(&lease.property_id, &lease.renter_id)?;
        match stage {
            Some(RenterStage::Lease) => Ok(()),
            Some(other) => Err(LeaseError::StageGate {
                stage: other.label().to_string(),
            }),
            None => Err(LeaseError::StageGate {
                stage: "untracked".to_string(),
            }),
        }
    }
}
