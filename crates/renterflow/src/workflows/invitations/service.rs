use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::domain::{Invitation, InvitationError, InvitationId, InvitationReply, InvitationStatus};
use super::repository::InvitationRepository;
use crate::workflows::board::domain::BoardError;
use crate::workflows::board::service::StatusBoard;
use crate::workflows::identity::RenterDirectory;
use crate::workflows::notices::domain::{NoticeDraft, NoticeKind};
use crate::workflows::notices::service::NoticeSink;
use crate::workflows::properties::domain::PropertyId;
use crate::workflows::properties::repository::PropertyRepository;
use crate::workflows::properties::service::fetch_owned;

static INVITATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_invitation_id() -> InvitationId {
    let id = INVITATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InvitationId(format!("inv-{id:06}"))
}

/// Service owning the invitation lifecycle. Acceptance opens the renter's
/// board row; declining leaves no trace beyond the invitation itself.
pub struct InvitationService<R> {
    repository: Arc<R>,
    properties: Arc<dyn PropertyRepository>,
    directory: Arc<dyn RenterDirectory>,
    notices: Arc<dyn NoticeSink>,
    board: Arc<dyn StatusBoard>,
}

impl<R> InvitationService<R>
where
    R: InvitationRepository + 'static,
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

    pub fn invite(
        &self,
        property_id: &PropertyId,
        landlord_id: &str,
        renter_email: &str,
        at: DateTime<Utc>,
    ) -> Result<Invitation, InvitationError> {
        let property = fetch_owned(self.properties.as_ref(), property_id, landlord_id)?;

        let invitation = Invitation {
            id: next_invitation_id(),
            property_id: property_id.clone(),
            landlord_id: landlord_id.to_string(),
            renter_email: renter_email.to_string(),
            status: InvitationStatus::Pending,
            invited_at: at,
            responded_at: None,
        };
        let stored = self.repository.insert(invitation)?;

        let renter = self.directory.resolve(renter_email)?;
        self.notices.publish(
            NoticeDraft::new(
                NoticeKind::InvitationSent,
                "You have been invited to rent",
                format!("You are invited to apply for {}.", property.address.line()),
                landlord_id,
                property_id.clone(),
                renter,
            )
            .about_invitation(stored.id.clone()),
            at,
        )?;

        Ok(stored)
    }

    pub fn respond(
        &self,
        id: &InvitationId,
        reply: InvitationReply,
        at: DateTime<Utc>,
    ) -> Result<Invitation, InvitationError> {
        let mut invitation = self.repository.fetch(id)?.ok_or(InvitationError::NotFound)?;
        invitation.respond(reply, at)?;
        self.repository.update(invitation.clone())?;

        let renter = self.directory.resolve(&invitation.renter_email)?;
        match reply {
            InvitationReply::Accepted => {
                match self.board.open(
                    &invitation.property_id,
                    &invitation.landlord_id,
                    &renter,
                    at,
                ) {
                    Ok(_) => {}
                    // A second accepted invitation for the same pair keeps the
                    // existing row.
                    Err(BoardError::AlreadyTracked) => {}
                    Err(other) => return Err(other.into()),
                }
                self.notices.publish(
                    NoticeDraft::new(
                        NoticeKind::InvitationAccepted,
                        "Invitation accepted",
                        format!("{} accepted your invitation.", invitation.renter_email),
                        &invitation.landlord_id,
                        invitation.property_id.clone(),
                        renter,
                    )
                    .about_invitation(invitation.id.clone()),
                    at,
                )?;
            }
            InvitationReply::Declined => {
                self.notices.publish(
                    NoticeDraft::new(
                        NoticeKind::InvitationDeclined,
                        "Invitation declined",
                        format!("{} declined your invitation.", invitation.renter_email),
                        &invitation.landlord_id,
                        invitation.property_id.clone(),
                        renter,
                    )
                    .about_invitation(invitation.id.clone()),
                    at,
                )?;
            }
        }

        Ok(invitation)
    }

    pub fn get(&self, id: &InvitationId) -> Result<Invitation, InvitationError> {
        self.repository.fetch(id)?.ok_or(InvitationError::NotFound)
    }

    pub fn list_for_landlord(&self, landlord_id: &str) -> Result<Vec<Invitation>, InvitationError> {
        Ok(self.repository.for_landlord(landlord_id)?)
    }

    /// Sweep pending invitations older than `ttl` into `Expired`.
    pub fn expire_stale(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<usize, InvitationError> {
        let mut expired = 0;
        for mut invitation in self.repository.pending()? {
            if invitation.invited_at + ttl <= now && invitation.expire(now) {
                self.repository.update(invitation)?;
                expired += 1;
            }
        }
        if expired > 0 {
            info!(expired, "expired stale invitations");
        }
        Ok(expired)
    }
}
