//! Payment receipt enumerations

use serde::{Deserialize, Serialize};

/// Direction of money movement on a payment receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    PaymentIn,
    PaymentOut,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::PaymentIn => "payment_in",
            PaymentType::PaymentOut => "payment_out",
        }
    }
}

/// What a payment receipt settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentReferenceType {
    Purchase,
    Sale,
    Opening,
    Adjustment,
}

impl PaymentReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentReferenceType::Purchase => "purchase",
            PaymentReferenceType::Sale => "sale",
            PaymentReferenceType::Opening => "opening",
            PaymentReferenceType::Adjustment => "adjustment",
        }
    }
}

/// Lifecycle of a payment receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
    Bounced,
}

impl PaymentRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRecordStatus::Pending => "pending",
            PaymentRecordStatus::Completed => "completed",
            PaymentRecordStatus::Cancelled => "cancelled",
            PaymentRecordStatus::Bounced => "bounced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentType::PaymentIn).unwrap(),
            "\"payment_in\""
        );
        assert_eq!(PaymentType::PaymentOut.as_str(), "payment_out");
    }
}
