//! HTTP handlers for product endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::types::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::{
    CreateProductInput, ListProductsQuery, ProductService, ProductWithCategory,
    StockAdjustmentInput, UpdateProductInput,
};
use crate::AppState;

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductWithCategory>>)> {
    let service = ProductService::new(state.db);
    let product = service.create(current_user.0.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Product created successfully",
            product,
        )),
    ))
}

/// List products
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<ApiResponse<Vec<ProductWithCategory>>>> {
    let service = ProductService::new(state.db);
    let products = service.list(current_user.0.user_id, query).await?;
    Ok(Json(ApiResponse::list(products)))
}

/// Get a product by id
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductWithCategory>>> {
    let service = ProductService::new(state.db);
    let product = service.get(current_user.0.user_id, product_id).await?;
    Ok(Json(ApiResponse::data(product)))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<ApiResponse<ProductWithCategory>>> {
    let service = ProductService::new(state.db);
    let product = service
        .update(current_user.0.user_id, product_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Product updated successfully",
        product,
    )))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = ProductService::new(state.db);
    service.delete(current_user.0.user_id, product_id).await?;
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}

/// Manually adjust a product's stock
pub async fn update_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<StockAdjustmentInput>,
) -> AppResult<Json<ApiResponse<ProductWithCategory>>> {
    let service = ProductService::new(state.db);
    let product = service
        .update_stock(current_user.0.user_id, product_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Stock updated successfully",
        product,
    )))
}
