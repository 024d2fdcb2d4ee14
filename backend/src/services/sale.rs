//! Sale invoice service
//!
//! Creating a sale first verifies that every line has sufficient stock, then
//! issues the goods; deleting a sale returns them. All stock checks use
//! strict less-than, so selling exactly the remaining stock is allowed. The
//! invoice row, its line items, and every stock adjustment commit in a single
//! transaction, and each decrement is guarded so a concurrent sale cannot
//! oversell.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    balance_amount, compute_invoice_totals, compute_line_amounts, PartyType, PaymentMode,
    PaymentStatus, SaleStatus,
};
use shared::validation::{validate_amount, validate_quantity, validate_required_text, validate_tax_rate};

/// Sale service for customer invoices and their stock effects
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// Sale invoice record; `party_name` is null for walk-in customers
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_number: String,
    pub party_id: Option<Uuid>,
    pub party_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub sale_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub shipping_charges: Decimal,
    pub other_charges: Decimal,
    pub round_off: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    pub payment_status: String,
    pub payment_mode: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item on a sale invoice
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Sale invoice with its line items
#[derive(Debug, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// One line of a create-invoice request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
}

/// Input for creating a sale invoice
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub invoice_number: String,
    pub party_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub items: Vec<SaleLineItemInput>,
    pub sale_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub discount_amount: Option<Decimal>,
    pub shipping_charges: Option<Decimal>,
    pub other_charges: Option<Decimal>,
    pub round_off: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub payment_mode: Option<PaymentMode>,
    pub status: Option<SaleStatus>,
    pub notes: Option<String>,
}

/// Input for updating sale header fields (line items are immutable)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleInput {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub sale_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub payment_mode: Option<PaymentMode>,
    pub status: Option<SaleStatus>,
    pub notes: Option<String>,
}

/// Input for the dedicated payment update endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalePaymentInput {
    pub paid_amount: Option<Decimal>,
}

/// List filters for sales
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalesQuery {
    pub party: Option<Uuid>,
    pub payment_status: Option<PaymentStatus>,
    pub status: Option<SaleStatus>,
    pub search: Option<String>,
}

/// Validated line item with its stock snapshot and derived amounts
struct PreparedSaleItem {
    product_id: Uuid,
    product_name: String,
    current_stock: i32,
    quantity: i32,
    unit_price: Decimal,
    discount: Decimal,
    tax_rate: Decimal,
    tax_amount: Decimal,
    total: Decimal,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a sale invoice and issue its items from stock.
    ///
    /// Every line is verified against current stock before anything is
    /// written; one failing line rejects the whole sale.
    pub async fn create(&self, user_id: Uuid, input: CreateSaleInput) -> AppResult<SaleWithItems> {
        validate_required_text(&input.invoice_number).map_err(|msg| AppError::Validation {
            field: "invoiceNumber".to_string(),
            message: msg.to_string(),
        })?;
        if input.items.is_empty() {
            return Err(AppError::ValidationError(
                "At least one item is required".to_string(),
            ));
        }
        let paid_amount = input.paid_amount.unwrap_or(Decimal::ZERO);
        validate_amount(paid_amount).map_err(|msg| AppError::Validation {
            field: "paidAmount".to_string(),
            message: msg.to_string(),
        })?;
        let discount_amount = input.discount_amount.unwrap_or(Decimal::ZERO);
        let shipping_charges = input.shipping_charges.unwrap_or(Decimal::ZERO);
        let other_charges = input.other_charges.unwrap_or(Decimal::ZERO);
        let round_off = input.round_off.unwrap_or(Decimal::ZERO);
        for (field, value) in [
            ("discountAmount", discount_amount),
            ("shippingCharges", shipping_charges),
            ("otherCharges", other_charges),
        ] {
            validate_amount(value).map_err(|msg| AppError::Validation {
                field: field.to_string(),
                message: msg.to_string(),
            })?;
        }

        // A registered customer is optional; walk-in sales carry name/phone only
        if let Some(party_id) = input.party_id {
            let party_type = sqlx::query_scalar::<_, String>(
                "SELECT party_type FROM parties WHERE id = $1 AND user_id = $2",
            )
            .bind(party_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Party".to_string()))?;

            let party_type = PartyType::from_str(&party_type)
                .map_err(|msg| AppError::Internal(msg.to_string()))?;
            if !party_type.can_buy() {
                return Err(AppError::ValidationError(
                    "Party is not a customer".to_string(),
                ));
            }
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sales WHERE user_id = $1 AND invoice_number = $2)",
        )
        .bind(user_id)
        .bind(input.invoice_number.trim())
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("invoice number".to_string()));
        }

        let items = self.prepare_items(user_id, &input.items).await?;

        // Check stock availability for every line before touching anything
        for item in &items {
            if item.current_stock < item.quantity {
                return Err(AppError::InsufficientStock(format!(
                    "Insufficient stock for {}",
                    item.product_name
                )));
            }
        }

        let totals = compute_invoice_totals(
            &items
                .iter()
                .map(|i| compute_line_amounts(i.quantity, i.unit_price, i.discount, i.tax_rate))
                .collect::<Vec<_>>(),
            discount_amount,
            shipping_charges,
            other_charges,
            round_off,
        );
        let payment_status = PaymentStatus::classify(paid_amount, totals.total_amount);
        let balance = balance_amount(totals.total_amount, paid_amount);
        let sale_date = input.sale_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let sale_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO sales (
                user_id, invoice_number, party_id, customer_name, customer_phone,
                customer_address, sale_date, due_date, subtotal, discount_amount,
                tax_amount, shipping_charges, other_charges, round_off, total_amount,
                paid_amount, balance_amount, payment_status, payment_mode, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(input.invoice_number.trim())
        .bind(input.party_id)
        .bind(&input.customer_name)
        .bind(&input.customer_phone)
        .bind(&input.customer_address)
        .bind(sale_date)
        .bind(input.due_date)
        .bind(totals.subtotal)
        .bind(discount_amount)
        .bind(totals.tax_amount)
        .bind(shipping_charges)
        .bind(other_charges)
        .bind(round_off)
        .bind(totals.total_amount)
        .bind(paid_amount)
        .bind(balance)
        .bind(payment_status.as_str())
        .bind(input.payment_mode.unwrap_or_default().as_str())
        .bind(input.status.unwrap_or_default().as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, product_id, product_name, quantity, unit_price,
                    discount, tax_rate, tax_amount, total, position
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(sale_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.discount)
            .bind(item.tax_rate)
            .bind(item.tax_amount)
            .bind(item.total)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: a concurrent sale that won the race aborts this one
            let result = sqlx::query(
                r#"
                UPDATE products
                SET current_stock = current_stock - $1, updated_at = NOW()
                WHERE id = $2 AND user_id = $3 AND current_stock >= $1
                "#,
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::InsufficientStock(format!(
                    "Insufficient stock for {}",
                    item.product_name
                )));
            }
        }

        tx.commit().await?;

        self.get(user_id, sale_id).await
    }

    /// List sales with optional filters; search matches the invoice number
    pub async fn list(&self, user_id: Uuid, query: ListSalesQuery) -> AppResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT s.id, s.user_id, s.invoice_number, s.party_id, pt.name AS party_name,
                   s.customer_name, s.customer_phone, s.customer_address, s.sale_date,
                   s.due_date, s.subtotal, s.discount_amount, s.tax_amount,
                   s.shipping_charges, s.other_charges, s.round_off, s.total_amount,
                   s.paid_amount, s.balance_amount, s.payment_status, s.payment_mode,
                   s.status, s.notes, s.created_at, s.updated_at
            FROM sales s
            LEFT JOIN parties pt ON pt.id = s.party_id
            WHERE s.user_id = $1
              AND ($2::uuid IS NULL OR s.party_id = $2)
              AND ($3::text IS NULL OR s.payment_status = $3)
              AND ($4::text IS NULL OR s.status = $4)
              AND ($5::text IS NULL OR s.invoice_number ILIKE '%' || $5 || '%')
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(query.party)
        .bind(query.payment_status.map(|s| s.as_str()))
        .bind(query.status.map(|s| s.as_str()))
        .bind(&query.search)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    /// Get a sale by id, with its line items
    pub async fn get(&self, user_id: Uuid, sale_id: Uuid) -> AppResult<SaleWithItems> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT s.id, s.user_id, s.invoice_number, s.party_id, pt.name AS party_name,
                   s.customer_name, s.customer_phone, s.customer_address, s.sale_date,
                   s.due_date, s.subtotal, s.discount_amount, s.tax_amount,
                   s.shipping_charges, s.other_charges, s.round_off, s.total_amount,
                   s.paid_amount, s.balance_amount, s.payment_status, s.payment_mode,
                   s.status, s.notes, s.created_at, s.updated_at
            FROM sales s
            LEFT JOIN parties pt ON pt.id = s.party_id
            WHERE s.id = $1 AND s.user_id = $2
            "#,
        )
        .bind(sale_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = self.get_items(sale_id).await?;

        Ok(SaleWithItems { sale, items })
    }

    /// Partially update sale header fields
    pub async fn update(
        &self,
        user_id: Uuid,
        sale_id: Uuid,
        input: UpdateSaleInput,
    ) -> AppResult<SaleWithItems> {
        let existing = self.get(user_id, sale_id).await?.sale;

        let customer_name = input.customer_name.or(existing.customer_name);
        let customer_phone = input.customer_phone.or(existing.customer_phone);
        let customer_address = input.customer_address.or(existing.customer_address);
        let sale_date = input.sale_date.unwrap_or(existing.sale_date);
        let due_date = input.due_date.or(existing.due_date);
        let payment_mode = input
            .payment_mode
            .map(|m| m.as_str().to_string())
            .unwrap_or(existing.payment_mode);
        let status = input
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let notes = input.notes.or(existing.notes);

        sqlx::query(
            r#"
            UPDATE sales
            SET customer_name = $1, customer_phone = $2, customer_address = $3,
                sale_date = $4, due_date = $5, payment_mode = $6, status = $7,
                notes = $8, updated_at = NOW()
            WHERE id = $9 AND user_id = $10
            "#,
        )
        .bind(&customer_name)
        .bind(&customer_phone)
        .bind(&customer_address)
        .bind(sale_date)
        .bind(due_date)
        .bind(&payment_mode)
        .bind(&status)
        .bind(&notes)
        .bind(sale_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get(user_id, sale_id).await
    }

    /// Delete a sale and return its items to stock
    pub async fn delete(&self, user_id: Uuid, sale_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sales WHERE id = $1 AND user_id = $2)",
        )
        .bind(sale_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Sale".to_string()));
        }

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_name, quantity, unit_price,
                   discount, tax_rate, tax_amount, total
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sales WHERE id = $1 AND user_id = $2")
            .bind(sale_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // Return the sold quantities; products deleted since then are skipped
        for item in &items {
            let Some(product_id) = item.product_id else {
                continue;
            };

            sqlx::query(
                r#"
                UPDATE products
                SET current_stock = current_stock + $1, updated_at = NOW()
                WHERE id = $2 AND user_id = $3
                "#,
            )
            .bind(item.quantity)
            .bind(product_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Update the paid amount; payment status and balance are recomputed here only
    pub async fn update_payment(
        &self,
        user_id: Uuid,
        sale_id: Uuid,
        input: UpdateSalePaymentInput,
    ) -> AppResult<SaleWithItems> {
        let Some(paid_amount) = input.paid_amount else {
            return Err(AppError::ValidationError(
                "paidAmount is required".to_string(),
            ));
        };
        validate_amount(paid_amount).map_err(|msg| AppError::Validation {
            field: "paidAmount".to_string(),
            message: msg.to_string(),
        })?;

        let total_amount = sqlx::query_scalar::<_, Decimal>(
            "SELECT total_amount FROM sales WHERE id = $1 AND user_id = $2",
        )
        .bind(sale_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let payment_status = PaymentStatus::classify(paid_amount, total_amount);
        let balance = balance_amount(total_amount, paid_amount);

        sqlx::query(
            r#"
            UPDATE sales
            SET paid_amount = $1, payment_status = $2, balance_amount = $3, updated_at = NOW()
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(paid_amount)
        .bind(payment_status.as_str())
        .bind(balance)
        .bind(sale_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get(user_id, sale_id).await
    }

    /// Load line items in invoice order
    async fn get_items(&self, sale_id: Uuid) -> AppResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_name, quantity, unit_price,
                   discount, tax_rate, tax_amount, total
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Validate each line, snapshot product name and stock, derive its amounts
    async fn prepare_items(
        &self,
        user_id: Uuid,
        items: &[SaleLineItemInput],
    ) -> AppResult<Vec<PreparedSaleItem>> {
        let mut prepared = Vec::with_capacity(items.len());

        for item in items {
            validate_quantity(item.quantity).map_err(|msg| AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            })?;
            validate_amount(item.unit_price).map_err(|msg| AppError::Validation {
                field: "unitPrice".to_string(),
                message: msg.to_string(),
            })?;
            let discount = item.discount.unwrap_or(Decimal::ZERO);
            validate_amount(discount).map_err(|msg| AppError::Validation {
                field: "discount".to_string(),
                message: msg.to_string(),
            })?;
            let tax_rate = item.tax_rate.unwrap_or(Decimal::ZERO);
            validate_tax_rate(tax_rate).map_err(|msg| AppError::Validation {
                field: "taxRate".to_string(),
                message: msg.to_string(),
            })?;

            let row = sqlx::query_as::<_, (String, i32)>(
                "SELECT name, current_stock FROM products WHERE id = $1 AND user_id = $2",
            )
            .bind(item.product_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let amounts = compute_line_amounts(item.quantity, item.unit_price, discount, tax_rate);

            prepared.push(PreparedSaleItem {
                product_id: item.product_id,
                product_name: row.0,
                current_stock: row.1,
                quantity: item.quantity,
                unit_price: item.unit_price,
                discount,
                tax_rate,
                tax_amount: amounts.tax_amount,
                total: amounts.total,
            });
        }

        Ok(prepared)
    }
}
