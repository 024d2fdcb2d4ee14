//! Request middleware for the Inventory & Billing Platform

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
