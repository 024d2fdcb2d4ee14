//! Shared types and models for the Inventory & Billing Platform
//!
//! This crate contains the domain vocabulary shared between the backend and
//! other components of the system: the uniform API response envelope, closed
//! domain enumerations, billing arithmetic, and validation helpers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
