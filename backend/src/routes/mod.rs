//! Route definitions for the Inventory & Billing Platform

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - category management
        .nest("/categories", category_routes())
        // Protected routes - product catalog and stock
        .nest("/products", product_routes())
        // Protected routes - trading parties
        .nest("/parties", party_routes())
        // Protected routes - purchase invoices
        .nest("/purchases", purchase_routes())
        // Protected routes - sale invoices
        .nest("/sales", sale_routes())
        // Protected routes - payment receipts
        .nest("/payments", payment_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Category management routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product management routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/stock", patch(handlers::update_stock))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Party management routes (protected)
fn party_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_parties).post(handlers::create_party),
        )
        .route(
            "/:party_id",
            get(handlers::get_party)
                .put(handlers::update_party)
                .delete(handlers::delete_party),
        )
        .route("/:party_id/balance", patch(handlers::update_balance))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase invoice routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
        .route(
            "/:purchase_id/payment",
            patch(handlers::update_purchase_payment),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sale invoice routes (protected)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/:sale_id",
            get(handlers::get_sale)
                .put(handlers::update_sale)
                .delete(handlers::delete_sale),
        )
        .route("/:sale_id/payment", patch(handlers::update_sale_payment))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Payment receipt routes (protected)
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_payments).post(handlers::create_payment),
        )
        .route(
            "/:payment_id",
            get(handlers::get_payment).delete(handlers::delete_payment),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
