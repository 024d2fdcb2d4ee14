//! Category management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::validate_required_text;

/// Category service for managing product categories
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

/// Category record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for updating a category
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// List filters for categories
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCategoriesQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a category
    pub async fn create(&self, user_id: Uuid, input: CreateCategoryInput) -> AppResult<Category> {
        validate_required_text(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        self.ensure_unique_name(user_id, &input.name, None).await?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name, description, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(&self.db)
        .await?;

        Ok(category)
    }

    /// List categories with optional filters, newest first
    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListCategoriesQuery,
    ) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, is_active, created_at, updated_at
            FROM categories
            WHERE user_id = $1
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(query.is_active)
        .bind(&query.search)
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Get a category by id
    pub async fn get(&self, user_id: Uuid, category_id: Uuid) -> AppResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, is_active, created_at, updated_at
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        Ok(category)
    }

    /// Partially update a category
    pub async fn update(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> AppResult<Category> {
        let existing = self.get(user_id, category_id).await?;

        let name = match input.name {
            Some(name) => {
                validate_required_text(&name).map_err(|msg| AppError::Validation {
                    field: "name".to_string(),
                    message: msg.to_string(),
                })?;
                if !name.trim().eq_ignore_ascii_case(&existing.name) {
                    self.ensure_unique_name(user_id, &name, Some(category_id))
                        .await?;
                }
                name.trim().to_string()
            }
            None => existing.name,
        };
        let description = input.description.or(existing.description);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, description = $2, is_active = $3, updated_at = NOW()
            WHERE id = $4 AND user_id = $5
            RETURNING id, user_id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(is_active)
        .bind(category_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(category)
    }

    /// Delete a category; rejected while products still reference it
    pub async fn delete(&self, user_id: Uuid, category_id: Uuid) -> AppResult<()> {
        let in_use = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1 AND user_id = $2)",
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if in_use {
            return Err(AppError::ValidationError(
                "Category has products and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(())
    }

    /// Category names are unique per account (case-insensitive)
    async fn ensure_unique_name(
        &self,
        user_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM categories
                WHERE user_id = $1 AND LOWER(name) = LOWER($2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(user_id)
        .bind(name.trim())
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::DuplicateEntry("category name".to_string()));
        }

        Ok(())
    }
}
