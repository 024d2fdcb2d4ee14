//! HTTP handlers for category endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::types::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::category::{
    Category, CategoryService, CreateCategoryInput, ListCategoriesQuery, UpdateCategoryInput,
};
use crate::AppState;

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let service = CategoryService::new(state.db);
    let category = service.create(current_user.0.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Category created successfully",
            category,
        )),
    ))
}

/// List categories
pub async fn list_categories(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListCategoriesQuery>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let service = CategoryService::new(state.db);
    let categories = service.list(current_user.0.user_id, query).await?;
    Ok(Json(ApiResponse::list(categories)))
}

/// Get a category by id
pub async fn get_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let service = CategoryService::new(state.db);
    let category = service.get(current_user.0.user_id, category_id).await?;
    Ok(Json(ApiResponse::data(category)))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(input): Json<UpdateCategoryInput>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let service = CategoryService::new(state.db);
    let category = service
        .update(current_user.0.user_id, category_id, input)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Category updated successfully",
        category,
    )))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = CategoryService::new(state.db);
    service.delete(current_user.0.user_id, category_id).await?;
    Ok(Json(ApiResponse::message("Category deleted successfully")))
}
