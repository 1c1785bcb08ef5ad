//! Renter-to-landlord message scenarios: attachment storage, monotonic reads,
//! and soft deletion with blob cleanup.

mod common;

use common::{at, portal, sample_property, LANDLORD, RENTER_EMAIL};

use renterflow::workflows::identity::RenterDirectory;
use renterflow::workflows::messages::{AttachmentUpload, MessageStatus, NewMessage};

#[test]
fn message_with_attachment_round_trips_and_deletes() {
    let portal = portal();
    let property = portal
        .properties
        .register(sample_property(LANDLORD))
        .expect("property registers");
    let renter = portal.directory.resolve(RENTER_EMAIL).expect("renter id");

    let message = portal
        .messages
        .send(
            NewMessage {
                renter_id: renter,
                landlord_id: LANDLORD.to_string(),
                property_id: property.id.clone(),
                lease_id: None,
                body: "The kitchen faucet drips overnight.".to_string(),
                attachments: vec![AttachmentUpload {
                    file_name: "faucet.jpg".to_string(),
                    content_type: mime::IMAGE_JPEG,
                    bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
                }],
            },
            at(1, 9),
        )
        .expect("message sends");

    assert_eq!(message.status, MessageStatus::Unread);
    assert_eq!(message.attachments.len(), 1);
    let attachment_url = message.attachments[0].url.clone();
    assert!(portal.storage.contains_url(&attachment_url));

    let inbox = portal.messages.inbox_for_landlord(LANDLORD).expect("inbox");
    assert_eq!(inbox.len(), 1);

    let read = portal
        .messages
        .mark_read(&message.id, at(1, 12))
        .expect("marks read");
    let reread = portal
        .messages
        .mark_read(&message.id, at(2, 12))
        .expect("idempotent");
    assert_eq!(read.read_at, reread.read_at);

    portal.messages.delete(&message.id).expect("deletes");
    assert!(!portal.storage.contains_url(&attachment_url));
    assert!(portal
        .messages
        .inbox_for_landlord(LANDLORD)
        .expect("inbox")
        .is_empty());

    // Deleting again stays a no-op.
    portal.messages.delete(&message.id).expect("repeat delete");
}
