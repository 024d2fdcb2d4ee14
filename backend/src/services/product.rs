//! Product catalog service for managing products and manual stock adjustments

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AdjustmentDirection, ProductUnit};
use shared::validation::{
    validate_amount, validate_quantity, validate_required_text, validate_tax_rate,
};

/// Product service for catalog and stock management
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category_id: Uuid,
    pub description: Option<String>,
    pub unit: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub current_stock: i32,
    pub min_stock_level: i32,
    pub tax_rate: Decimal,
    pub hsn_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product with its category name, for list and detail responses
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category_id: Uuid,
    pub category_name: String,
    pub description: Option<String>,
    pub unit: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub current_stock: i32,
    pub min_stock_level: i32,
    pub tax_rate: Decimal,
    pub hsn_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category_id: Uuid,
    pub description: Option<String>,
    pub unit: Option<ProductUnit>,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub min_stock_level: Option<i32>,
    pub tax_rate: Option<Decimal>,
    pub hsn_code: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub unit: Option<ProductUnit>,
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub min_stock_level: Option<i32>,
    pub tax_rate: Option<Decimal>,
    pub hsn_code: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for the manual stock adjustment endpoint
#[derive(Debug, Deserialize)]
pub struct StockAdjustmentInput {
    pub quantity: Option<i32>,
    #[serde(rename = "type")]
    pub direction: Option<AdjustmentDirection>,
}

/// List filters for products
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub category: Option<Uuid>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<ProductWithCategory> {
        validate_required_text(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.purchase_price).map_err(|msg| AppError::Validation {
            field: "purchasePrice".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.sale_price).map_err(|msg| AppError::Validation {
            field: "salePrice".to_string(),
            message: msg.to_string(),
        })?;
        let tax_rate = input.tax_rate.unwrap_or(Decimal::ZERO);
        validate_tax_rate(tax_rate).map_err(|msg| AppError::Validation {
            field: "taxRate".to_string(),
            message: msg.to_string(),
        })?;
        let min_stock_level = input.min_stock_level.unwrap_or(10);
        if min_stock_level < 0 {
            return Err(AppError::Validation {
                field: "minStockLevel".to_string(),
                message: "Minimum stock level cannot be negative".to_string(),
            });
        }

        self.ensure_category(user_id, input.category_id).await?;

        if let Some(sku) = &input.sku {
            self.ensure_unique_field(user_id, "sku", sku, None).await?;
        }
        if let Some(barcode) = &input.barcode {
            self.ensure_unique_field(user_id, "barcode", barcode, None)
                .await?;
        }

        let product_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (
                user_id, name, sku, barcode, category_id, description, unit,
                purchase_price, sale_price, min_stock_level, tax_rate, hsn_code, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(input.name.trim())
        .bind(&input.sku)
        .bind(&input.barcode)
        .bind(input.category_id)
        .bind(&input.description)
        .bind(input.unit.unwrap_or_default().as_str())
        .bind(input.purchase_price)
        .bind(input.sale_price)
        .bind(min_stock_level)
        .bind(tax_rate)
        .bind(&input.hsn_code)
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(&self.db)
        .await?;

        self.get(user_id, product_id).await
    }

    /// List products with optional filters, newest first
    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListProductsQuery,
    ) -> AppResult<Vec<ProductWithCategory>> {
        let products = sqlx::query_as::<_, ProductWithCategory>(
            r#"
            SELECT p.id, p.user_id, p.name, p.sku, p.barcode, p.category_id,
                   c.name AS category_name, p.description, p.unit,
                   p.purchase_price, p.sale_price, p.current_stock, p.min_stock_level,
                   p.tax_rate, p.hsn_code, p.is_active, p.created_at, p.updated_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.user_id = $1
              AND ($2::uuid IS NULL OR p.category_id = $2)
              AND ($3::boolean IS NULL OR p.is_active = $3)
              AND ($4::text IS NULL OR p.name ILIKE '%' || $4 || '%')
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(query.category)
        .bind(query.is_active)
        .bind(&query.search)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Get a product by id
    pub async fn get(&self, user_id: Uuid, product_id: Uuid) -> AppResult<ProductWithCategory> {
        let product = sqlx::query_as::<_, ProductWithCategory>(
            r#"
            SELECT p.id, p.user_id, p.name, p.sku, p.barcode, p.category_id,
                   c.name AS category_name, p.description, p.unit,
                   p.purchase_price, p.sale_price, p.current_stock, p.min_stock_level,
                   p.tax_rate, p.hsn_code, p.is_active, p.created_at, p.updated_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Partially update a product
    pub async fn update(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<ProductWithCategory> {
        let existing = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, user_id, name, sku, barcode, category_id, description, unit,
                   purchase_price, sale_price, current_stock, min_stock_level,
                   tax_rate, hsn_code, is_active, created_at, updated_at
            FROM products
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let name = match input.name {
            Some(name) => {
                validate_required_text(&name).map_err(|msg| AppError::Validation {
                    field: "name".to_string(),
                    message: msg.to_string(),
                })?;
                name.trim().to_string()
            }
            None => existing.name,
        };
        let purchase_price = input.purchase_price.unwrap_or(existing.purchase_price);
        validate_amount(purchase_price).map_err(|msg| AppError::Validation {
            field: "purchasePrice".to_string(),
            message: msg.to_string(),
        })?;
        let sale_price = input.sale_price.unwrap_or(existing.sale_price);
        validate_amount(sale_price).map_err(|msg| AppError::Validation {
            field: "salePrice".to_string(),
            message: msg.to_string(),
        })?;
        let tax_rate = input.tax_rate.unwrap_or(existing.tax_rate);
        validate_tax_rate(tax_rate).map_err(|msg| AppError::Validation {
            field: "taxRate".to_string(),
            message: msg.to_string(),
        })?;
        let min_stock_level = input.min_stock_level.unwrap_or(existing.min_stock_level);
        if min_stock_level < 0 {
            return Err(AppError::Validation {
                field: "minStockLevel".to_string(),
                message: "Minimum stock level cannot be negative".to_string(),
            });
        }

        let category_id = input.category_id.unwrap_or(existing.category_id);
        if category_id != existing.category_id {
            self.ensure_category(user_id, category_id).await?;
        }

        let sku = input.sku.or(existing.sku);
        if let Some(sku) = &sku {
            self.ensure_unique_field(user_id, "sku", sku, Some(product_id))
                .await?;
        }
        let barcode = input.barcode.or(existing.barcode);
        if let Some(barcode) = &barcode {
            self.ensure_unique_field(user_id, "barcode", barcode, Some(product_id))
                .await?;
        }

        let unit = input
            .unit
            .map(|u| u.as_str().to_string())
            .unwrap_or(existing.unit);
        let description = input.description.or(existing.description);
        let hsn_code = input.hsn_code.or(existing.hsn_code);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        sqlx::query(
            r#"
            UPDATE products
            SET name = $1, sku = $2, barcode = $3, category_id = $4, description = $5,
                unit = $6, purchase_price = $7, sale_price = $8, min_stock_level = $9,
                tax_rate = $10, hsn_code = $11, is_active = $12, updated_at = NOW()
            WHERE id = $13 AND user_id = $14
            "#,
        )
        .bind(&name)
        .bind(&sku)
        .bind(&barcode)
        .bind(category_id)
        .bind(&description)
        .bind(&unit)
        .bind(purchase_price)
        .bind(sale_price)
        .bind(min_stock_level)
        .bind(tax_rate)
        .bind(&hsn_code)
        .bind(is_active)
        .bind(product_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get(user_id, product_id).await
    }

    /// Delete a product
    pub async fn delete(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
            .bind(product_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Manually adjust stock (`{quantity, type: add|subtract}`)
    pub async fn update_stock(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        input: StockAdjustmentInput,
    ) -> AppResult<ProductWithCategory> {
        let (Some(quantity), Some(direction)) = (input.quantity, input.direction) else {
            return Err(AppError::ValidationError(
                "quantity and type (add/subtract) are required".to_string(),
            ));
        };
        validate_quantity(quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let current_stock = sqlx::query_scalar::<_, i32>(
            "SELECT current_stock FROM products WHERE id = $1 AND user_id = $2",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        match direction {
            AdjustmentDirection::Add => {
                sqlx::query(
                    r#"
                    UPDATE products
                    SET current_stock = current_stock + $1, updated_at = NOW()
                    WHERE id = $2 AND user_id = $3
                    "#,
                )
                .bind(quantity)
                .bind(product_id)
                .bind(user_id)
                .execute(&self.db)
                .await?;
            }
            AdjustmentDirection::Subtract => {
                // Conditional update so a concurrent decrement cannot oversell
                let result = sqlx::query(
                    r#"
                    UPDATE products
                    SET current_stock = current_stock - $1, updated_at = NOW()
                    WHERE id = $2 AND user_id = $3 AND current_stock >= $1
                    "#,
                )
                .bind(quantity)
                .bind(product_id)
                .bind(user_id)
                .execute(&self.db)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::InsufficientStock(format!(
                        "Insufficient stock. Available: {}",
                        current_stock
                    )));
                }
            }
        }

        self.get(user_id, product_id).await
    }

    /// Validate that the category exists and belongs to the account
    async fn ensure_category(&self, user_id: Uuid, category_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)",
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(())
    }

    /// SKU and barcode are unique per account when present
    async fn ensure_unique_field(
        &self,
        user_id: Uuid,
        field: &str,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<()> {
        let sql = match field {
            "sku" => {
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM products
                    WHERE user_id = $1 AND sku = $2 AND ($3::uuid IS NULL OR id <> $3)
                )
                "#
            }
            _ => {
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM products
                    WHERE user_id = $1 AND barcode = $2 AND ($3::uuid IS NULL OR id <> $3)
                )
                "#
            }
        };

        let exists = sqlx::query_scalar::<_, bool>(sql)
            .bind(user_id)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.db)
            .await?;

        if exists {
            return Err(AppError::DuplicateEntry(field.to_string()));
        }

        Ok(())
    }
}
