//! HTTP handlers for purchase invoice endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::types::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::purchase::{
    CreatePurchaseInput, ListPurchasesQuery, Purchase, PurchaseService, PurchaseWithItems,
    UpdatePaymentInput, UpdatePurchaseInput,
};
use crate::AppState;

/// Create a purchase invoice
pub async fn create_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<PurchaseWithItems>>)> {
    let service = PurchaseService::new(state.db);
    let purchase = service.create(current_user.0.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Purchase created successfully",
            purchase,
        )),
    ))
}

/// List purchase invoices
pub async fn list_purchases(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListPurchasesQuery>,
) -> AppResult<Json<ApiResponse<Vec<Purchase>>>> {
    let service = PurchaseService::new(state.db);
    let purchases = service.list(current_user.0.user_id, query).await?;
    Ok(Json(ApiResponse::list(purchases)))
}

/// Get a purchase invoice by id
pub async fn get_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PurchaseWithItems>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service.get(current_user.0.user_id, purchase_id).await?;
    Ok(Json(ApiResponse::data(purchase)))
}

/// Update purchase header fields
pub async fn update_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> AppResult<Json<ApiResponse<PurchaseWithItems>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service
        .update(current_user.0.user_id, purchase_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Purchase updated successfully",
        purchase,
    )))
}

/// Delete a purchase invoice (reverses its stock receipt)
pub async fn delete_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = PurchaseService::new(state.db);
    service.delete(current_user.0.user_id, purchase_id).await?;
    Ok(Json(ApiResponse::message("Purchase deleted successfully")))
}

/// Update the paid amount and recompute payment status
pub async fn update_purchase_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePaymentInput>,
) -> AppResult<Json<ApiResponse<PurchaseWithItems>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service
        .update_payment(current_user.0.user_id, purchase_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Payment status updated successfully",
        purchase,
    )))
}
