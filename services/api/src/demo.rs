use crate::infra::Portal;
use chrono::{Duration, Utc};
use clap::Args;
use renterflow::error::AppError;
use renterflow::workflows::applications::{EmploymentRecord, NewApplication};
use renterflow::workflows::billing::{IssueInvoice, PaymentMethod};
use renterflow::workflows::invitations::InvitationReply;
use renterflow::workflows::leases::{LeaseAction, LeaseTemplate, LeaseUpload};
use renterflow::workflows::messages::{AttachmentUpload, NewMessage};
use renterflow::workflows::properties::{Address, NewProperty, PetPolicy, PropertyKind};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Include the pet fee in the demo invoice
    #[arg(long)]
    pub(crate) include_pet_fee: bool,
    /// Print both parties' notice inboxes at the end
    #[arg(long)]
    pub(crate) list_notices: bool,
}

/// Walk one renter from invitation to a settled first invoice against the
/// in-memory backend, narrating each workflow as it fires.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let portal = Portal::in_memory("https://storage.local/renterflow-demo");
    let now = Utc::now();
    let landlord = "landlord-demo";
    let renter_email = "jordan.pierce@example.com";

    println!("Renter lifecycle demo");

    let property = portal.properties.register(NewProperty {
        landlord_id: landlord.to_string(),
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
        application_fee: 75,
        pet_policy: Some(PetPolicy {
            allowed: true,
            fee: 40,
            restrictions: vec!["cats and dogs under 40 lbs".to_string()],
        }),
        image_urls: Vec::new(),
    })?;
    println!(
        "Registered property {} at {}",
        property.id.0,
        property.address.line()
    );

    let invitation = portal
        .invitations
        .invite(&property.id, landlord, renter_email, now)?;
    portal
        .invitations
        .respond(&invitation.id, InvitationReply::Accepted, now)?;
    println!("Invitation {} accepted by {renter_email}", invitation.id.0);

    let application = portal.applications.submit(
        NewApplication {
            property_id: property.id.clone(),
            renter_email: renter_email.to_string(),
            full_name: "Jordan Pierce".to_string(),
            employment: EmploymentRecord {
                employer: "Acme Logistics".to_string(),
                position: "Dispatcher".to_string(),
                monthly_income: 4300,
                months_employed: 30,
            },
        },
        now,
    )?;
    let application = portal.applications.decide(
        &application.id,
        landlord,
        renterflow::workflows::applications::ApplicationDecision::Approve,
        now,
    )?;
    println!(
        "Application {} {}",
        application.id.0,
        application.status.label()
    );

    let lease = portal.leases.send(
        LeaseTemplate {
            name: "standard-lease".to_string(),
            url: "https://storage.local/renterflow-demo/templates/standard-lease.pdf".to_string(),
        },
        &property.id,
        landlord,
        renter_email,
        now,
    )?;
    println!(
        "Lease {} sent (filled copy: {})",
        lease.id.0, lease.filled_pdf_url
    );

    let lease = portal.leases.renter_submit(
        &lease.id,
        renter_email,
        LeaseUpload {
            file_name: "signed-lease.pdf".to_string(),
            content_type: mime::APPLICATION_PDF,
            bytes: b"%PDF-1.4 signed by Jordan Pierce".to_vec(),
        },
        now,
    )?;
    let lease = portal
        .leases
        .landlord_decision(&lease.id, landlord, LeaseAction::Accept, now)?;
    println!("Lease {} {}", lease.id.0, lease.status.label());

    let invoice = portal.billing.issue(
        IssueInvoice {
            property_id: property.id.clone(),
            landlord_id: landlord.to_string(),
            renter_email: renter_email.to_string(),
            include_pet_fee: args.include_pet_fee,
            notes: Some("First month, deposit, and fees".to_string()),
            due_on: now.date_naive() + Duration::days(14),
        },
        now,
    )?;
    println!(
        "Invoice {} issued for ${} (due {})",
        invoice.id.0, invoice.amount, invoice.due_on
    );

    let outcome = portal
        .settlement
        .settle(&invoice.id, PaymentMethod::Card, "txn-demo-0001", now)?;
    println!("\nPayment breakdown");
    for payment in &outcome.payments {
        println!("- {}: ${}", payment.kind.label(), payment.amount);
    }
    if outcome.pending_projections.is_empty() {
        println!("All settlement projections applied");
    } else {
        println!(
            "Pending settlement projections: {}",
            outcome.pending_projections.join(", ")
        );
    }

    portal.messages.send(
        NewMessage {
            renter_id: lease.renter_id.clone(),
            landlord_id: landlord.to_string(),
            property_id: property.id.clone(),
            lease_id: Some(lease.id.clone()),
            body: "Keys received, everything looks great. One window latch is loose.".to_string(),
            attachments: vec![AttachmentUpload {
                file_name: "window-latch.jpg".to_string(),
                content_type: mime::IMAGE_JPEG,
                bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            }],
        },
        now,
    )?;
    let inbox = portal.messages.inbox_for_landlord(landlord)?;
    println!("\nLandlord message inbox: {} message(s)", inbox.len());

    println!("\nStatus board for {}", property.address.line());
    for row in portal.board.board_for_property(&property.id)? {
        println!(
            "- {}: {}{}",
            row.renter_id.0,
            row.stage_label,
            if row.offered_actions.is_empty() {
                String::new()
            } else {
                format!(" (actions: {})", row.offered_actions.join(", "))
            }
        );
    }

    if args.list_notices {
        println!("\nLandlord notices");
        for notice in portal.notices.landlord_inbox(landlord)? {
            println!("- [{}] {}", notice.kind.label(), notice.subject);
        }
        println!("\nLandlord lease notices");
        for notice in portal.notices.landlord_lease_inbox(landlord)? {
            let read = if notice.read_at.is_some() { "read" } else { "unread" };
            println!("- [{}] {} ({read})", notice.kind.label(), notice.subject);
        }
        println!("\nRenter notices");
        for notice in portal.notices.renter_inbox(&lease.renter_id)? {
            println!("- [{}] {}", notice.kind.label(), notice.subject);
        }
    }

    Ok(())
}
