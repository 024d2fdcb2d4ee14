//! Domain models for the Inventory & Billing Platform
//!
//! Re-exports the shared domain vocabulary; database row types live next to
//! the services that query them.

pub use shared::models::*;
