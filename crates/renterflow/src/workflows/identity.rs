//! Stable renter identity.
//!
//! The portal joins every collection on [`RenterId`]; emails are display data
//! living on the profile and are only consulted at the workflow edges where
//! landlords address renters by address-book entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::properties::domain::PropertyId;
use super::RepositoryError;

/// The one join key for a renter across collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenterId(pub String);

/// Display and history data for one renter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenterProfile {
    pub renter_id: RenterId,
    pub email: String,
    pub full_name: Option<String>,
    pub current_property: Option<PropertyId>,
    pub rent_history: Vec<RentHistoryEntry>,
}

impl RenterProfile {
    pub fn new(renter_id: RenterId, email: impl Into<String>) -> Self {
        Self {
            renter_id,
            email: email.into(),
            full_name: None,
            current_property: None,
            rent_history: Vec::new(),
        }
    }
}

/// One prior tenancy. Dates are calendar dates so a stored entry reloads to
/// the same day regardless of the reader's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentHistoryEntry {
    pub property_name: String,
    pub monthly_rent: u32,
    pub moved_in: NaiveDate,
    pub moved_out: Option<NaiveDate>,
}

/// Lookup table mapping emails to stable ids, plus profile storage.
pub trait RenterDirectory: Send + Sync {
    /// Find-or-create the stable id for an email address.
    fn resolve(&self, email: &str) -> Result<RenterId, RepositoryError>;

    fn profile(&self, id: &RenterId) -> Result<Option<RenterProfile>, RepositoryError>;

    fn upsert_profile(&self, profile: RenterProfile) -> Result<(), RepositoryError>;

    fn set_current_property(
        &self,
        id: &RenterId,
        property: PropertyId,
    ) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rent_history_dates_round_trip_without_shifting() {
        let profile = RenterProfile {
            renter_id: RenterId("rtr-000001".to_string()),
            email: "renter@example.com".to_string(),
            full_name: Some("Jordan Pierce".to_string()),
            current_property: None,
            rent_history: vec![RentHistoryEntry {
                property_name: "Riverfront Lofts".to_string(),
                monthly_rent: 1450,
                moved_in: NaiveDate::from_ymd_opt(2022, 3, 1).expect("valid date"),
                moved_out: Some(NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date")),
            }],
        };

        let encoded = serde_json::to_string(&profile).expect("serializes");
        let decoded: RenterProfile = serde_json::from_str(&encoded).expect("deserializes");

        assert_eq!(decoded, profile);
        assert_eq!(
            decoded.rent_history[0].moved_in,
            NaiveDate::from_ymd_opt(2022, 3, 1).expect("valid date")
        );
    }
}
