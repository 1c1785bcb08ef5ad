//! Shared wiring for the workflow integration tests: the whole portal over
//! the in-memory backend, with the raw repositories kept reachable so tests
//! can assert on stored state.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use renterflow::storage::{MemoryObjectStore, ObjectStore};
use renterflow::store::memory::{
    MemoryApplications, MemoryBilling, MemoryBoard, MemoryDirectory, MemoryInvitations,
    MemoryLeases, MemoryMessages, MemoryNotices, MemoryProperties,
};
use renterflow::workflows::applications::{ApplicationService, EmploymentRecord, NewApplication};
use renterflow::workflows::billing::{
    standard_projections, BillingService, SettlementProjection, SettlementWorkflow,
};
use renterflow::workflows::board::{BoardService, StatusBoard};
use renterflow::workflows::identity::RenterDirectory;
use renterflow::workflows::invitations::InvitationService;
use renterflow::workflows::leases::{
    DocumentFill, LeaseRepository, LeaseWorkflow, PassthroughFill,
};
use renterflow::workflows::messages::MessageService;
use renterflow::workflows::notices::{NoticeService, NoticeSink};
use renterflow::workflows::properties::{
    Address, NewProperty, PetPolicy, PropertyKind, PropertyRepository, PropertyService,
};

pub const LANDLORD: &str = "landlord-1";
pub const RENTER_EMAIL: &str = "renter@example.com";
pub const STORAGE_BASE: &str = "https://storage.local/renterflow-test";

pub struct TestPortal {
    pub properties: Arc<PropertyService<MemoryProperties>>,
    pub invitations: Arc<InvitationService<MemoryInvitations>>,
    pub applications: Arc<ApplicationService<MemoryApplications>>,
    pub leases: Arc<LeaseWorkflow<MemoryLeases>>,
    pub notices: Arc<NoticeService<MemoryNotices>>,
    pub board: Arc<BoardService<MemoryBoard>>,
    pub billing: Arc<BillingService<MemoryBilling>>,
    pub settlement: Arc<SettlementWorkflow<MemoryBilling>>,
    pub messages: Arc<MessageService<MemoryMessages>>,

    pub property_repo: Arc<MemoryProperties>,
    pub lease_repo: Arc<MemoryLeases>,
    pub billing_repo: Arc<MemoryBilling>,
    pub directory: Arc<MemoryDirectory>,
    pub storage: Arc<MemoryObjectStore>,
}

impl TestPortal {
    /// Rebuild the settlement workflow with a custom projection set, sharing
    /// this portal's billing store.
    pub fn settlement_with(
        &self,
        projections: Vec<Arc<dyn SettlementProjection>>,
    ) -> SettlementWorkflow<MemoryBilling> {
        SettlementWorkflow::new(self.billing_repo.clone(), projections)
    }

    pub fn standard_projections(&self) -> Vec<Arc<dyn SettlementProjection>> {
        standard_projections(
            self.lease_repo.clone() as Arc<dyn LeaseRepository>,
            self.property_repo.clone() as Arc<dyn PropertyRepository>,
            self.directory.clone() as Arc<dyn RenterDirectory>,
            self.board.clone() as Arc<dyn StatusBoard>,
            self.notices.clone() as Arc<dyn NoticeSink>,
        )
    }
}

pub fn portal() -> TestPortal {
    let property_repo = Arc::new(MemoryProperties::default());
    let invitation_repo = Arc::new(MemoryInvitations::default());
    let application_repo = Arc::new(MemoryApplications::default());
    let lease_repo = Arc::new(MemoryLeases::default());
    let notice_repo = Arc::new(MemoryNotices::default());
    let board_repo = Arc::new(MemoryBoard::default());
    let billing_repo = Arc::new(MemoryBilling::default());
    let message_repo = Arc::new(MemoryMessages::default());

    let notices = Arc::new(NoticeService::new(notice_repo));
    let board = Arc::new(BoardService::new(board_repo));
    let directory = Arc::new(MemoryDirectory::default());
    let storage = Arc::new(MemoryObjectStore::new(STORAGE_BASE));

    let property_seam: Arc<dyn PropertyRepository> = property_repo.clone();
    let lease_seam: Arc<dyn LeaseRepository> = lease_repo.clone();
    let directory_seam: Arc<dyn RenterDirectory> = directory.clone();
    let notice_seam: Arc<dyn NoticeSink> = notices.clone();
    let board_seam: Arc<dyn StatusBoard> = board.clone();
    let storage_seam: Arc<dyn ObjectStore> = storage.clone();
    let fill: Arc<dyn DocumentFill> = Arc::new(PassthroughFill);

    let properties = Arc::new(PropertyService::new(property_repo.clone()));
    let invitations = Arc::new(InvitationService::new(
        invitation_repo,
        property_seam.clone(),
        directory_seam.clone(),
        notice_seam.clone(),
        board_seam.clone(),
    ));
    let applications = Arc::new(ApplicationService::new(
        application_repo,
        property_seam.clone(),
        directory_seam.clone(),
        notice_seam.clone(),
        board_seam.clone(),
    ));
    let leases = Arc::new(LeaseWorkflow::new(
        lease_repo.clone(),
        property_seam.clone(),
        directory_seam.clone(),
        notice_seam.clone(),
        board_seam.clone(),
        storage_seam.clone(),
        fill,
    ));
    let billing = Arc::new(BillingService::new(
        billing_repo.clone(),
        property_seam.clone(),
        directory_seam.clone(),
        notice_seam.clone(),
        board_seam.clone(),
    ));
    let settlement = Arc::new(SettlementWorkflow::new(
        billing_repo.clone(),
        standard_projections(
            lease_seam,
            property_seam,
            directory_seam,
            board_seam,
            notice_seam,
        ),
    ));
    let messages = Arc::new(MessageService::new(message_repo, storage_seam));

    TestPortal {
        properties,
        invitations,
        applications,
        leases,
        notices,
        board,
        billing,
        settlement,
        messages,
        property_repo,
        lease_repo,
        billing_repo,
        directory,
        storage,
    }
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn sample_property(landlord_id: &str) -> NewProperty {
    NewProperty {
        landlord_id: landlord_id.to_string(),
        address: Address {
            street: "411 Court Ave".to_string(),
            unit: Some("Unit 2B".to_string()),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            postal_code: "50309".to_string(),
        },
        kind: PropertyKind::Apartment,
        bedrooms: 2,
        bathrooms: 1,
        square_feet: 880,
        monthly_rent: 2000,
        security_deposit: 500,
        application_fee: 0,
        pet_policy: Some(PetPolicy {
            allowed: true,
            fee: 40,
            restrictions: Vec::new(),
        }),
        image_urls: Vec::new(),
    }
}

pub fn sample_application(
    property: &renterflow::workflows::properties::Property,
) -> NewApplication {
    NewApplication {
        property_id: property.id.clone(),
        renter_email: RENTER_EMAIL.to_string(),
        full_name: "Jordan Pierce".to_string(),
        employment: EmploymentRecord {
            employer: "Acme Logistics".to_string(),
            position: "Dispatcher".to_string(),
            monthly_income: 4300,
            months_employed: 30,
        },
    }
}
