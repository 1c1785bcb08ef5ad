use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{
    ApplicationDecision, ApplicationError, ApplicationId, ApplicationStatus, NewApplication,
    RentalApplication,
};
use super::repository::ApplicationRepository;
use crate::workflows::board::domain::RenterStage;
use crate::workflows::board::service::StatusBoard;
use crate::workflows::identity::RenterDirectory;
use crate::workflows::notices::domain::{NoticeDraft, NoticeKind};
use crate::workflows::notices::service::NoticeSink;
use crate::workflows::properties::domain::Property;
use crate::workflows::properties::repository::PropertyRepository;
use crate::workflows::properties::service::{fetch_owned, PropertyError};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Service owning rental application intake, review, and landlord decisions.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    properties: Arc<dyn PropertyRepository>,
    directory: Arc<dyn RenterDirectory>,
    notices: Arc<dyn NoticeSink>,
    board: Arc<dyn StatusBoard>,
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
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

    pub fn submit(
        &self,
        intake: NewApplication,
        at: DateTime<Utc>,
    ) -> Result<RentalApplication, ApplicationError> {
        let property = self
            .properties
            .fetch(&intake.property_id)
            .map_err(PropertyError::from)?
            .ok_or(PropertyError::NotFound)?;

        let application = RentalApplication {
            id: next_application_id(),
            property_id: intake.property_id,
            renter_email: intake.renter_email,
            full_name: intake.full_name,
            employment: intake.employment,
            status: ApplicationStatus::Submitted,
            submitted_at: at,
            decided_at: None,
        };
        let stored = self.repository.insert(application)?;

        let renter = self.directory.resolve(&stored.renter_email)?;
        if let Some(mut profile) = self.directory.profile(&renter)? {
            if profile.full_name.is_none() {
                profile.full_name = Some(stored.full_name.clone());
                self.directory.upsert_profile(profile)?;
            }
        }

        self.notices.publish(
            NoticeDraft::new(
                NoticeKind::ApplicationReceived,
                "New rental application",
                format!(
                    "{} applied for {}.",
                    stored.full_name,
                    property.address.line()
                ),
                &property.landlord_id,
                stored.property_id.clone(),
                renter,
            ),
            at,
        )?;

        Ok(stored)
    }

    /// Move a submitted application into explicit review.
    pub fn begin_review(
        &self,
        id: &ApplicationId,
        landlord_id: &str,
        at: DateTime<Utc>,
    ) -> Result<RentalApplication, ApplicationError> {
        let (mut application, _property) = self.fetch_for_landlord(id, landlord_id)?;
        application.transition(ApplicationStatus::Pending, at)?;
        self.repository.update(application.clone())?;
        Ok(application)
    }

    /// Landlord decision. Approval advances the renter's board row to
    /// `Application` so the lease step becomes reachable; rejection leaves
    /// the board untouched.
    pub fn decide(
        &self,
        id: &ApplicationId,
        landlord_id: &str,
        decision: ApplicationDecision,
        at: DateTime<Utc>,
    ) -> Result<RentalApplication, ApplicationError> {
        let (mut application, property) = self.fetch_for_landlord(id, landlord_id)?;

        let (next, kind, subject) = match decision {
            ApplicationDecision::Approve => (
                ApplicationStatus::Approved,
                NoticeKind::ApplicationApproved,
                "Application approved",
            ),
            ApplicationDecision::Reject => (
                ApplicationStatus::Rejected,
                NoticeKind::ApplicationRejected,
                "Application rejected",
            ),
        };
        application.transition(next, at)?;
        self.repository.update(application.clone())?;

        let renter = self.directory.resolve(&application.renter_email)?;

        if decision == ApplicationDecision::Approve {
            match self.board.stage_of(&application.property_id, &renter)? {
                Some(RenterStage::Invite) => {
                    self.board
                        .advance(&application.property_id, &renter, RenterStage::Application, at)?;
                }
                None => {
                    // Walk-in applicant with no accepted invitation; start
                    // tracking and move straight to the application stage.
                    self.board
                        .open(&application.property_id, landlord_id, &renter, at)?;
                    self.board
                        .advance(&application.property_id, &renter, RenterStage::Application, at)?;
                }
                Some(_) => {}
            }
        }

        self.notices.publish(
            NoticeDraft::new(
                kind,
                subject,
                format!(
                    "Your application for {} was {}.",
                    property.address.line(),
                    application.status.label()
                ),
                landlord_id,
                application.property_id.clone(),
                renter,
            ),
            at,
        )?;

        Ok(application)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<RentalApplication, ApplicationError> {
        self.repository.fetch(id)?.ok_or(ApplicationError::NotFound)
    }

    /// All applications across the landlord's properties, filtered by a
    /// case-insensitive substring over name, email, and property address.
    pub fn search(
        &self,
        landlord_id: &str,
        query: &str,
    ) -> Result<Vec<RentalApplication>, ApplicationError> {
        let properties = self
            .properties
            .for_landlord(landlord_id)
            .map_err(PropertyError::from)?;

        let mut matches = Vec::new();
        for property in &properties {
            let line = property.address.line();
            for application in self.repository.for_property(&property.id)? {
                if application.matches_query(&line, query) {
                    matches.push(application);
                }
            }
        }
        matches.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(matches)
    }

    fn fetch_for_landlord(
        &self,
        id: &ApplicationId,
        landlord_id: &str,
    ) -> Result<(RentalApplication, Property), ApplicationError> {
        let application = self.repository.fetch(id)?.ok_or(ApplicationError::NotFound)?;
        let property = fetch_owned(self.properties.as_ref(), &application.property_id, landlord_id)?;
        Ok((application, property))
    }
}
