//! Manual adjustment direction shared by the stock and balance endpoints

use serde::{Deserialize, Serialize};

/// Direction of a manual stock or balance adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentDirection {
    Add,
    Subtract,
}

impl AdjustmentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentDirection::Add => "add",
            AdjustmentDirection::Subtract => "subtract",
        }
    }
}
