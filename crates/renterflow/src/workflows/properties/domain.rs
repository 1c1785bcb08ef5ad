use serde::{Deserialize, Serialize};

/// Identifier wrapper for directory properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Mailing address for a listed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub unit: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Address {
    /// Single-line rendering used for notices, snapshots, and search.
    pub fn line(&self) -> String {
        match &self.unit {
            Some(unit) => format!(
                "{} {unit}, {}, {} {}",
                self.street, self.city, self.state, self.postal_code
            ),
            None => format!(
                "{}, {}, {} {}",
                self.street, self.city, self.state, self.postal_code
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Apartment,
    House,
    Condo,
    Townhouse,
    Duplex,
}

impl PropertyKind {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyKind::Apartment => "apartment",
            PropertyKind::House => "house",
            PropertyKind::Condo => "condo",
            PropertyKind::Townhouse => "townhouse",
            PropertyKind::Duplex => "duplex",
        }
    }
}

/// Pet terms attached to a listing; the fee feeds invoice breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetPolicy {
    pub allowed: bool,
    pub fee: u32,
    pub restrictions: Vec<String>,
}

impl PetPolicy {
    pub fn none() -> Self {
        Self {
            allowed: false,
            fee: 0,
            restrictions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Occupied,
    Maintenance,
}

impl PropertyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Occupied => "occupied",
            PropertyStatus::Maintenance => "maintenance",
        }
    }
}

/// A directory listing owned by one landlord. Never hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub landlord_id: String,
    pub address: Address,
    pub kind: PropertyKind,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub square_feet: u32,
    pub monthly_rent: u32,
    pub security_deposit: u32,
    pub application_fee: u32,
    pub pet_policy: PetPolicy,
    pub status: PropertyStatus,
    pub image_urls: Vec<String>,
}

/// Intake shape for a new listing; the service assigns id and status.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub landlord_id: String,
    pub address: Address,
    pub kind: PropertyKind,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub square_feet: u32,
    pub monthly_rent: u32,
    pub security_deposit: u32,
    pub application_fee: u32,
    #[serde(default)]
    pub pet_policy: Option<PetPolicy>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Pricing mutation applied in place; `None` leaves a component unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingUpdate {
    pub monthly_rent: Option<u32>,
    pub security_deposit: Option<u32>,
    pub application_fee: Option<u32>,
    pub pet_fee: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_line_includes_unit_when_present() {
        let mut address = Address {
            street: "411 Court Ave".to_string(),
            unit: Some("Unit 2B".to_string()),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            postal_code: "50309".to_string(),
        };
        assert_eq!(
            address.line(),
            "411 Court Ave Unit 2B, Des Moines, IA 50309"
        );

        address.unit = None;
        assert_eq!(address.line(), "411 Court Ave, Des Moines, IA 50309");
    }
}
