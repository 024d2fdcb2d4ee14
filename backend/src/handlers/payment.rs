//! HTTP handlers for payment receipt endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::types::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::payment::{CreatePaymentInput, ListPaymentsQuery, Payment, PaymentService};
use crate::AppState;

/// Record a payment receipt
pub async fn create_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePaymentInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Payment>>)> {
    let service = PaymentService::new(state.db);
    let payment = service.create(current_user.0.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Payment recorded successfully",
            payment,
        )),
    ))
}

/// List payment receipts
pub async fn list_payments(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListPaymentsQuery>,
) -> AppResult<Json<ApiResponse<Vec<Payment>>>> {
    let service = PaymentService::new(state.db);
    let payments = service.list(current_user.0.user_id, query).await?;
    Ok(Json(ApiResponse::list(payments)))
}

/// Get a payment receipt by id
pub async fn get_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let service = PaymentService::new(state.db);
    let payment = service.get(current_user.0.user_id, payment_id).await?;
    Ok(Json(ApiResponse::data(payment)))
}

/// Delete a payment receipt
pub async fn delete_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = PaymentService::new(state.db);
    service.delete(current_user.0.user_id, payment_id).await?;
    Ok(Json(ApiResponse::message("Payment deleted successfully")))
}
