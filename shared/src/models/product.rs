//! Product catalog models

use serde::{Deserialize, Serialize};

/// Unit of measure for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductUnit {
    #[default]
    Pcs,
    Kg,
    G,
    Ltr,
    Ml,
    Box,
    Pack,
    Dozen,
    Meter,
    Feet,
}

impl ProductUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductUnit::Pcs => "pcs",
            ProductUnit::Kg => "kg",
            ProductUnit::G => "g",
            ProductUnit::Ltr => "ltr",
            ProductUnit::Ml => "ml",
            ProductUnit::Box => "box",
            ProductUnit::Pack => "pack",
            ProductUnit::Dozen => "dozen",
            ProductUnit::Meter => "meter",
            ProductUnit::Feet => "feet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_defaults_to_pcs() {
        assert_eq!(ProductUnit::default(), ProductUnit::Pcs);
        assert_eq!(ProductUnit::default().as_str(), "pcs");
    }
}
