use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use renterflow::storage::{MemoryObjectStore, ObjectStore};
use renterflow::store::memory::{
    MemoryApplications, MemoryBilling, MemoryBoard, MemoryDirectory, MemoryInvitations,
    MemoryLeases, MemoryMessages, MemoryNotices, MemoryProperties,
};
use renterflow::workflows::applications::ApplicationService;
use renterflow::workflows::billing::{standard_projections, BillingService, SettlementWorkflow};
use renterflow::workflows::board::{BoardService, StatusBoard};
use renterflow::workflows::identity::RenterDirectory;
use renterflow::workflows::invitations::InvitationService;
use renterflow::workflows::leases::{DocumentFill, LeaseRepository, LeaseWorkflow, PassthroughFill};
use renterflow::workflows::messages::MessageService;
use renterflow::workflows::notices::{NoticeService, NoticeSink};
use renterflow::workflows::properties::{PropertyRepository, PropertyService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The whole portal wired over the in-memory backend. One instance backs the
/// HTTP server; the demo builds its own throwaway copy.
pub(crate) struct Portal {
    pub(crate) properties: Arc<PropertyService<MemoryProperties>>,
    pub(crate) invitations: Arc<InvitationService<MemoryInvitations>>,
    pub(crate) applications: Arc<ApplicationService<MemoryApplications>>,
    pub(crate) leases: Arc<LeaseWorkflow<MemoryLeases>>,
    pub(crate) notices: Arc<NoticeService<MemoryNotices>>,
    pub(crate) board: Arc<BoardService<MemoryBoard>>,
    pub(crate) billing: Arc<BillingService<MemoryBilling>>,
    pub(crate) settlement: Arc<SettlementWorkflow<MemoryBilling>>,
    pub(crate) messages: Arc<MessageService<MemoryMessages>>,
}

impl Portal {
    pub(crate) fn in_memory(storage_base_url: &str) -> Self {
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
        let storage = Arc::new(MemoryObjectStore::new(storage_base_url));

        let property_seam: Arc<dyn PropertyRepository> = property_repo.clone();
        let lease_seam: Arc<dyn LeaseRepository> = lease_repo.clone();
        let directory_seam: Arc<dyn RenterDirectory> = directory.clone();
        let notice_seam: Arc<dyn NoticeSink> = notices.clone();
        let board_seam: Arc<dyn StatusBoard> = board.clone();
        let storage_seam: Arc<dyn ObjectStore> = storage.clone();
        let fill: Arc<dyn DocumentFill> = Arc::new(PassthroughFill);

        let properties = Arc::new(PropertyService::new(property_repo));
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
            lease_repo,
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
            billing_repo,
            standard_projections(
                lease_seam,
                property_seam,
                directory_seam,
                board_seam,
                notice_seam,
            ),
        ));
        let messages = Arc::new(MessageService::new(message_repo, storage_seam));

        Self {
            properties,
            invitations,
            applications,
            leases,
            notices,
            board,
            billing,
            settlement,
            messages,
        }
    }
}
