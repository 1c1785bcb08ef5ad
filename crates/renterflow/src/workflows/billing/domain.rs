use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::board::domain::BoardError;
use crate::workflows::identity::RenterId;
use crate::workflows::notices::service::NoticeError;
use crate::workflows::properties::domain::{Property, PropertyId};
use crate::workflows::properties::service::PropertyError;
use crate::workflows::RepositoryError;

/// Identifier wrapper for invoices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub String);

/// Identifier wrapper for payment records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Sent,
    Paid,
    Overdue,
    Cancelled,
    Partial,
}

impl InvoiceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
            InvoiceStatus::Partial => "partial",
        }
    }

    /// `Paid` and `Cancelled` are terminal.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Pending, InvoiceStatus::Sent)
                | (InvoiceStatus::Sent, InvoiceStatus::Paid)
                | (InvoiceStatus::Sent, InvoiceStatus::Overdue)
                | (InvoiceStatus::Sent, InvoiceStatus::Cancelled)
                | (InvoiceStatus::Sent, InvoiceStatus::Partial)
                | (InvoiceStatus::Overdue, InvoiceStatus::Paid)
                | (InvoiceStatus::Overdue, InvoiceStatus::Cancelled)
                | (InvoiceStatus::Partial, InvoiceStatus::Paid)
        )
    }
}

/// The invoice total split into the components that become payment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceBreakdown {
    pub monthly_rent: u32,
    pub security_deposit: u32,
    pub application_fee: u32,
    pub pet_fee: u32,
}

impl InvoiceBreakdown {
    /// Derive the breakdown from the property's current pricing. The pet fee
    /// only participates when the landlord opts it in.
    pub fn from_property(property: &Property, include_pet_fee: bool) -> Self {
        Self {
            monthly_rent: property.monthly_rent,
            security_deposit: property.security_deposit,
            application_fee: property.application_fee,
            pet_fee: if include_pet_fee {
                property.pet_policy.fee
            } else {
                0
            },
        }
    }

    pub fn total(&self) -> u32 {
        self.monthly_rent + self.security_deposit + self.application_fee + self.pet_fee
    }

    /// The non-zero components, each of which becomes one payment record.
    pub fn components(&self) -> Vec<(PaymentKind, u32)> {
        [
            (PaymentKind::MonthlyRent, self.monthly_rent),
            (PaymentKind::SecurityDeposit, self.security_deposit),
            (PaymentKind::ApplicationFee, self.application_fee),
            (PaymentKind::PetFee, self.pet_fee),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    MonthlyRent,
    SecurityDeposit,
    ApplicationFee,
    PetFee,
}

impl PaymentKind {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentKind::MonthlyRent => "monthly_rent",
            PaymentKind::SecurityDeposit => "security_deposit",
            PaymentKind::ApplicationFee => "application_fee",
            PaymentKind::PetFee => "pet_fee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    Check,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Pricing snapshot denormalized onto the invoice so later display survives
/// property edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub address_line: String,
    pub monthly_rent: u32,
    pub security_deposit: u32,
    pub application_fee: u32,
    pub pet_fee: u32,
}

impl PropertySnapshot {
    pub fn of(property: &Property) -> Self {
        Self {
            address_line: property.address.line(),
            monthly_rent: property.monthly_rent,
            security_deposit: property.security_deposit,
            application_fee: property.application_fee,
            pet_fee: property.pet_policy.fee,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("invoice not found")]
    NotFound,
    #[error("access denied: invoice belongs to another landlord")]
    AccessDenied,
    #[error("invalid invoice transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Notice(#[from] NoticeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// An issued invoice. `amount` always equals the breakdown total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub landlord_id: String,
    pub property_id: PropertyId,
    pub renter_id: RenterId,
    pub renter_email: String,
    pub amount: u32,
    pub breakdown: InvoiceBreakdown,
    pub status: InvoiceStatus,
    pub property: PropertySnapshot,
    pub notes: Option<String>,
    pub due_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn transition(&mut self, next: InvoiceStatus) -> Result<(), BillingError> {
        if !self.status.can_transition_to(next) {
            return Err(BillingError::InvalidTransition {
                from: self.status.label(),
                to: next.label(),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// One component of a settled invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentPayment {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: u32,
    pub kind: PaymentKind,
    pub due_on: NaiveDate,
    pub paid_on: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub transaction_id: String,
}

/// The single settlement event recorded when an invoice flips to paid;
/// projections consume it independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettled {
    pub invoice_id: InvoiceId,
    pub property_id: PropertyId,
    pub landlord_id: String,
    pub renter_id: RenterId,
    pub renter_email: String,
    pub amount: u32,
    pub breakdown: InvoiceBreakdown,
    pub method: PaymentMethod,
    pub transaction_id: String,
    pub settled_at: DateTime<Utc>,
}

/// Outbox row tracking which projections still owe the event an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementOutbox {
    pub event: PaymentSettled,
    pub pending: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::properties::domain::{
        Address, PetPolicy, PropertyKind, PropertyStatus,
    };

    fn property() -> Property {
        Property {
            id: PropertyId("prop-000001".to_string()),
            landlord_id: "landlord-1".to_string(),
            address: Address {
                street: "411 Court Ave".to_string(),
                unit: None,
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
            pet_policy: PetPolicy {
                allowed: true,
                fee: 40,
                restrictions: vec!["no exotic animals".to_string()],
            },
            status: PropertyStatus::Available,
            image_urls: Vec::new(),
        }
    }

    #[test]
    fn amount_is_the_sum_of_components() {
        let with_pet = InvoiceBreakdown::from_property(&property(), true);
        assert_eq!(with_pet.total(), 2000 + 500 + 75 + 40);

        let without_pet = InvoiceBreakdown::from_property(&property(), false);
        assert_eq!(without_pet.total(), 2000 + 500 + 75);
        assert_eq!(without_pet.pet_fee, 0);
    }

    #[test]
    fn components_skip_zero_amounts() {
        let mut property = property();
        property.application_fee = 0;
        let breakdown = InvoiceBreakdown::from_property(&property, false);
        let components = breakdown.components();
        assert_eq!(
            components,
            vec![
                (PaymentKind::MonthlyRent, 2000),
                (PaymentKind::SecurityDeposit, 500),
            ]
        );
    }

    #[test]
    fn paid_and_cancelled_are_terminal() {
        for terminal in [InvoiceStatus::Paid, InvoiceStatus::Cancelled] {
            for next in [
                InvoiceStatus::Pending,
                InvoiceStatus::Sent,
                InvoiceStatus::Paid,
                InvoiceStatus::Overdue,
                InvoiceStatus::Partial,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn overdue_invoices_can_still_be_paid() {
        assert!(InvoiceStatus::Sent.can_transition_to(InvoiceStatus::Overdue));
        assert!(InvoiceStatus::Overdue.can_transition_to(InvoiceStatus::Paid));
    }
}
