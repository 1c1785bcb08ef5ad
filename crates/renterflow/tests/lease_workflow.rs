//! Lease document workflow scenarios: send, renter completion, landlord
//! decision, and the board-stage gate that keeps decisions single-shot.

mod common;

use common::{at, portal, sample_application, sample_property, TestPortal, LANDLORD, RENTER_EMAIL};

use renterflow::workflows::applications::ApplicationDecision;
use renterflow::workflows::board::{RenterStage, StatusBoard};
use renterflow::workflows::identity::RenterDirectory;
use renterflow::workflows::invitations::InvitationReply;
use renterflow::workflows::leases::{
    LeaseAction, LeaseError, LeaseStatus, LeaseTemplate, LeaseUpload,
};
use renterflow::workflows::notices::NoticeKind;
use renterflow::workflows::properties::Property;

fn template() -> LeaseTemplate {
    LeaseTemplate {
        name: "standard-lease".to_string(),
        url: format!("{}/templates/standard-lease.pdf", common::STORAGE_BASE),
    }
}

fn upload() -> LeaseUpload {
    LeaseUpload {
        file_name: "signed.pdf".to_string(),
        content_type: mime::APPLICATION_PDF,
        bytes: b"%PDF-1.4 signed".to_vec(),
    }
}

/// Drive a renter to the point where a lease can be sent.
fn approved_renter(portal: &TestPortal) -> Property {
    let property = portal
        .properties
        .register(sample_property(LANDLORD))
        .expect("property registers");
    let invitation = portal
        .invitations
        .invite(&property.id, LANDLORD, RENTER_EMAIL, at(1, 9))
        .expect("invite");
    portal
        .invitations
        .respond(&invitation.id, InvitationReply::Accepted, at(1, 12))
        .expect("accept");
    let application = portal
        .applications
        .submit(sample_application(&property), at(2, 9))
        .expect("application submits");
    portal
        .applications
        .decide(&application.id, LANDLORD, ApplicationDecision::Approve, at(2, 15))
        .expect("approve");
    property
}

#[test]
fn sending_a_lease_notifies_the_renter_without_filling() {
    let portal = portal();
    let property = approved_renter(&portal);
    let renter = portal.directory.resolve(RENTER_EMAIL).expect("renter id");

    let lease = portal
        .leases
        .send(template(), &property.id, LANDLORD, RENTER_EMAIL, at(3, 9))
        .expect("lease sends");

    assert_eq!(lease.status, LeaseStatus::Sent);
    assert_eq!(lease.filled_pdf_url, lease.original_template_url);

    let inbox = portal.notices.renter_inbox(&renter).expect("renter inbox");
    let received = inbox
        .iter()
        .find(|notice| notice.kind == NoticeKind::LeaseReceived)
        .expect("lease_received notice exists");
    assert_eq!(received.renter_id, renter);
    assert_eq!(received.lease_id.as_ref(), Some(&lease.id));
    assert!(received.read_at.is_none());
}

#[test]
fn renter_submission_stores_upload_and_dedups_notices() {
    let portal = portal();
    let property = approved_renter(&portal);

    let lease = portal
        .leases
        .send(template(), &property.id, LANDLORD, RENTER_EMAIL, at(3, 9))
        .expect("lease sends");
    let lease = portal
        .leases
        .renter_submit(&lease.id, RENTER_EMAIL, upload(), at(4, 9))
        .expect("renter submits");

    assert_eq!(lease.status, LeaseStatus::RenterCompleted);
    assert!(lease.signature.renter_signed);
    assert_ne!(lease.filled_pdf_url, lease.original_template_url);
    assert!(portal.storage.contains_url(&lease.filled_pdf_url));

    let lease_inbox = portal
        .notices
        .landlord_lease_inbox(LANDLORD)
        .expect("lease inbox");
    let received = lease_inbox
        .iter()
        .find(|notice| notice.kind == NoticeKind::LeaseReceived)
        .expect("original notice kept");
    assert!(received.read_at.is_some(), "superseded notice marked read");
    let completed = lease_inbox
        .iter()
        .find(|notice| notice.kind == NoticeKind::LeaseCompleted)
        .expect("completion notice exists");
    assert!(completed.read_at.is_none());
}

#[test]
fn decision_requires_a_renter_completed_document() {
    let portal = portal();
    let property = approved_renter(&portal);

    let lease = portal
        .leases
        .send(template(), &property.id, LANDLORD, RENTER_EMAIL, at(3, 9))
        .expect("lease sends");

    assert!(matches!(
        portal
            .leases
            .landlord_decision(&lease.id, LANDLORD, LeaseAction::Accept, at(3, 10)),
        Err(LeaseError::InvalidTransition { .. })
    ));
}

#[test]
fn a_second_decision_is_gated_out() {
    let portal = portal();
    let property = approved_renter(&portal);
    let renter = portal.directory.resolve(RENTER_EMAIL).expect("renter id");

    let lease = portal
        .leases
        .send(template(), &property.id, LANDLORD, RENTER_EMAIL, at(3, 9))
        .expect("lease sends");
    portal
        .leases
        .renter_submit(&lease.id, RENTER_EMAIL, upload(), at(4, 9))
        .expect("renter submits");
    portal
        .leases
        .landlord_decision(&lease.id, LANDLORD, LeaseAction::Accept, at(4, 15))
        .expect("first decision");

    assert_eq!(
        portal.board.stage_of(&property.id, &renter).expect("stage"),
        Some(RenterStage::Accepted)
    );
    assert!(matches!(
        portal
            .leases
            .landlord_decision(&lease.id, LANDLORD, LeaseAction::Reject, at(4, 16)),
        Err(LeaseError::StageGate { .. })
    ));
}

#[test]
fn submission_from_the_wrong_renter_is_rejected() {
    let portal = portal();
    let property = approved_renter(&portal);

    let lease = portal
        .leases
        .send(template(), &property.id, LANDLORD, RENTER_EMAIL, at(3, 9))
        .expect("lease sends");

    assert!(matches!(
        portal
            .leases
            .renter_submit(&lease.id, "intruder@example.com", upload(), at(4, 9)),
        Err(LeaseError::WrongRenter)
    ));
}

#[test]
fn a_rejected_lease_can_be_resent() {
    let portal = portal();
    let property = approved_renter(&portal);
    let renter = portal.directory.resolve(RENTER_EMAIL).expect("renter id");

    let lease = portal
        .leases
        .send(template(), &property.id, LANDLORD, RENTER_EMAIL, at(3, 9))
        .expect("lease sends");
    portal
        .leases
        .renter_submit(&lease.id, RENTER_EMAIL, upload(), at(4, 9))
        .expect("renter submits");
    let lease = portal
        .leases
        .landlord_decision(&lease.id, LANDLORD, LeaseAction::Reject, at(4, 15))
        .expect("reject");
    assert_eq!(lease.status, LeaseStatus::Rejected);
    assert_eq!(
        portal.board.stage_of(&property.id, &renter).expect("stage"),
        Some(RenterStage::LeaseRejected)
    );

    let revised = portal
        .leases
        .send(template(), &property.id, LANDLORD, RENTER_EMAIL, at(5, 9))
        .expect("revised lease sends");
    assert_ne!(revised.id, lease.id);
    assert_eq!(
        portal.board.stage_of(&property.id, &renter).expect("stage"),
        Some(RenterStage::Lease)
    );
}
