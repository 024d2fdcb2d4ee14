//! HTTP handlers for sale invoice endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::types::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::sale::{
    CreateSaleInput, ListSalesQuery, Sale, SaleService, SaleWithItems, UpdateSaleInput,
    UpdateSalePaymentInput,
};
use crate::AppState;

/// Create a sale invoice
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<SaleWithItems>>)> {
    let service = SaleService::new(state.db);
    let sale = service.create(current_user.0.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Sale created successfully", sale)),
    ))
}

/// List sale invoices
pub async fn list_sales(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListSalesQuery>,
) -> AppResult<Json<ApiResponse<Vec<Sale>>>> {
    let service = SaleService::new(state.db);
    let sales = service.list(current_user.0.user_id, query).await?;
    Ok(Json(ApiResponse::list(sales)))
}

/// Get a sale invoice by id
pub async fn get_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SaleWithItems>>> {
    let service = SaleService::new(state.db);
    let sale = service.get(current_user.0.user_id, sale_id).await?;
    Ok(Json(ApiResponse::data(sale)))
}

/// Update sale header fields
pub async fn update_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<UpdateSaleInput>,
) -> AppResult<Json<ApiResponse<SaleWithItems>>> {
    let service = SaleService::new(state.db);
    let sale = service.update(current_user.0.user_id, sale_id, input).await?;
    Ok(Json(ApiResponse::with_message(
        "Sale updated successfully",
        sale,
    )))
}

/// Delete a sale invoice (returns its items to stock)
pub async fn delete_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = SaleService::new(state.db);
    service.delete(current_user.0.user_id, sale_id).await?;
    Ok(Json(ApiResponse::message("Sale deleted successfully")))
}

/// Update the paid amount and recompute payment status
pub async fn update_sale_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<UpdateSalePaymentInput>,
) -> AppResult<Json<ApiResponse<SaleWithItems>>> {
    let service = SaleService::new(state.db);
    let sale = service
        .update_payment(current_user.0.user_id, sale_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Payment status updated successfully",
        sale,
    )))
}
