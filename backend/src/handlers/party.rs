//! HTTP handlers for party endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::types::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::party::{
    BalanceAdjustmentInput, CreatePartyInput, ListPartiesQuery, Party, PartyService,
    UpdatePartyInput,
};
use crate::AppState;

/// Create a party
pub async fn create_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePartyInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Party>>)> {
    let service = PartyService::new(state.db);
    let party = service.create(current_user.0.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Party created successfully",
            party,
        )),
    ))
}

/// List parties
pub async fn list_parties(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListPartiesQuery>,
) -> AppResult<Json<ApiResponse<Vec<Party>>>> {
    let service = PartyService::new(state.db);
    let parties = service.list(current_user.0.user_id, query).await?;
    Ok(Json(ApiResponse::list(parties)))
}

/// Get a party by id
pub async fn get_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let party = service.get(current_user.0.user_id, party_id).await?;
    Ok(Json(ApiResponse::data(party)))
}

/// Update a party
pub async fn update_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
    Json(input): Json<UpdatePartyInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let party = service
        .update(current_user.0.user_id, party_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Party updated successfully",
        party,
    )))
}

/// Delete a party
pub async fn delete_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = PartyService::new(state.db);
    service.delete(current_user.0.user_id, party_id).await?;
    Ok(Json(ApiResponse::message("Party deleted successfully")))
}

/// Manually adjust a party's running balance
pub async fn update_balance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
    Json(input): Json<BalanceAdjustmentInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let party = service
        .update_balance(current_user.0.user_id, party_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Balance updated successfully",
        party,
    )))
}
