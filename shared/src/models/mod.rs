//! Domain models for the Inventory & Billing Platform

mod adjustment;
mod billing;
mod party;
mod payment;
mod product;

pub use adjustment::*;
pub use billing::*;
pub use party::*;
pub use payment::*;
pub use product::*;
