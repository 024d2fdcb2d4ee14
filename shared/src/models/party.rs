//! Trading party models

use serde::{Deserialize, Serialize};

/// Role a party plays in transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    Supplier,
    Customer,
    Both,
}

impl PartyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyType::Supplier => "supplier",
            PartyType::Customer => "customer",
            PartyType::Both => "both",
        }
    }

    /// Whether this party can appear on a purchase invoice
    pub fn can_supply(&self) -> bool {
        matches!(self, PartyType::Supplier | PartyType::Both)
    }

    /// Whether this party can appear on a sale invoice
    pub fn can_buy(&self) -> bool {
        matches!(self, PartyType::Customer | PartyType::Both)
    }
}

impl std::str::FromStr for PartyType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supplier" => Ok(PartyType::Supplier),
            "customer" => Ok(PartyType::Customer),
            "both" => Ok(PartyType::Both),
            _ => Err("Unknown party type"),
        }
    }
}

/// Postal address attached to a party
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_type_roles() {
        assert!(PartyType::Supplier.can_supply());
        assert!(!PartyType::Supplier.can_buy());
        assert!(PartyType::Customer.can_buy());
        assert!(!PartyType::Customer.can_supply());
        assert!(PartyType::Both.can_supply());
        assert!(PartyType::Both.can_buy());
    }

    #[test]
    fn party_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PartyType::Supplier).unwrap(),
            "\"supplier\""
        );
        assert_eq!(PartyType::Both.as_str(), "both");
    }
}
