//! Business logic services for the Inventory & Billing Platform

pub mod auth;
pub mod category;
pub mod party;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod sale;

pub use auth::AuthService;
pub use category::CategoryService;
pub use party::PartyService;
pub use payment::PaymentService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use sale::SaleService;
