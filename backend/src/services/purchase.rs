//! Purchase invoice service
//!
//! Creating a purchase receives stock into the catalog; deleting one reverses
//! that receipt. The invoice row, its line items, and every stock adjustment
//! commit in a single transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    balance_amount, compute_invoice_totals, compute_line_amounts, PartyType, PaymentStatus,
    PurchaseStatus,
};
use shared::validation::{validate_amount, validate_quantity, validate_required_text, validate_tax_rate};

/// Purchase service for supplier invoices and their stock effects
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Purchase invoice record with its supplier's name
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_number: String,
    pub reference_number: Option<String>,
    pub party_id: Uuid,
    pub party_name: String,
    pub purchase_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub shipping_charges: Decimal,
    pub other_charges: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    pub payment_status: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item on a purchase invoice
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Purchase invoice with its line items
#[derive(Debug, Serialize)]
pub struct PurchaseWithItems {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub items: Vec<PurchaseItem>,
}

/// One line of a create-invoice request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
}

/// Input for creating a purchase invoice
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseInput {
    pub invoice_number: String,
    pub reference_number: Option<String>,
    pub party_id: Uuid,
    pub items: Vec<LineItemInput>,
    pub purchase_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub discount_amount: Option<Decimal>,
    pub shipping_charges: Option<Decimal>,
    pub other_charges: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub status: Option<PurchaseStatus>,
    pub notes: Option<String>,
}

/// Input for updating purchase header fields (line items are immutable)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseInput {
    pub reference_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<PurchaseStatus>,
    pub notes: Option<String>,
}

/// Input for the dedicated payment update endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentInput {
    pub paid_amount: Option<Decimal>,
}

/// List filters for purchases
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPurchasesQuery {
    pub party: Option<Uuid>,
    pub payment_status: Option<PaymentStatus>,
    pub status: Option<PurchaseStatus>,
    pub search: Option<String>,
}

/// Validated line item ready for insertion, with derived amounts
struct PreparedItem {
    product_id: Uuid,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    discount: Decimal,
    tax_rate: Decimal,
    tax_amount: Decimal,
    total: Decimal,
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a purchase invoice and receive its items into stock
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreatePurchaseInput,
    ) -> AppResult<PurchaseWithItems> {
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

        // The supplying party must exist, belong to the account, and be able to supply
        let party_type = sqlx::query_scalar::<_, String>(
            "SELECT party_type FROM parties WHERE id = $1 AND user_id = $2",
        )
        .bind(input.party_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Party".to_string()))?;

        let party_type = PartyType::from_str(&party_type)
            .map_err(|msg| AppError::Internal(msg.to_string()))?;
        if !party_type.can_supply() {
            return Err(AppError::ValidationError(
                "Party is not a supplier".to_string(),
            ));
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchases WHERE user_id = $1 AND invoice_number = $2)",
        )
        .bind(user_id)
        .bind(input.invoice_number.trim())
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("invoice number".to_string()));
        }

        let items = self.prepare_items(user_id, &input.items).await?;

        let totals = compute_invoice_totals(
            &items
                .iter()
                .map(|i| compute_line_amounts(i.quantity, i.unit_price, i.discount, i.tax_rate))
                .collect::<Vec<_>>(),
            discount_amount,
            shipping_charges,
            other_charges,
            Decimal::ZERO,
        );
        let payment_status = PaymentStatus::classify(paid_amount, totals.total_amount);
        let balance = balance_amount(totals.total_amount, paid_amount);
        let purchase_date = input
            .purchase_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let purchase_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchases (
                user_id, invoice_number, reference_number, party_id, purchase_date,
                due_date, subtotal, discount_amount, tax_amount, shipping_charges,
                other_charges, total_amount, paid_amount, balance_amount,
                payment_status, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(input.invoice_number.trim())
        .bind(&input.reference_number)
        .bind(input.party_id)
        .bind(purchase_date)
        .bind(input.due_date)
        .bind(totals.subtotal)
        .bind(discount_amount)
        .bind(totals.tax_amount)
        .bind(shipping_charges)
        .bind(other_charges)
        .bind(totals.total_amount)
        .bind(paid_amount)
        .bind(balance)
        .bind(payment_status.as_str())
        .bind(input.status.unwrap_or_default().as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO purchase_items (
                    purchase_id, product_id, product_name, quantity, unit_price,
                    discount, tax_rate, tax_amount, total, position
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(purchase_id)
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

            // Receive the purchased quantity into stock
            sqlx::query(
                r#"
                UPDATE products
                SET current_stock = current_stock + $1, updated_at = NOW()
                WHERE id = $2 AND user_id = $3
                "#,
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get(user_id, purchase_id).await
    }

    /// List purchases with optional filters; search matches the invoice number
    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListPurchasesQuery,
    ) -> AppResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT p.id, p.user_id, p.invoice_number, p.reference_number, p.party_id,
                   pt.name AS party_name, p.purchase_date, p.due_date, p.subtotal,
                   p.discount_amount, p.tax_amount, p.shipping_charges, p.other_charges,
                   p.total_amount, p.paid_amount, p.balance_amount, p.payment_status,
                   p.status, p.notes, p.created_at, p.updated_at
            FROM purchases p
            JOIN parties pt ON pt.id = p.party_id
            WHERE p.user_id = $1
              AND ($2::uuid IS NULL OR p.party_id = $2)
              AND ($3::text IS NULL OR p.payment_status = $3)
              AND ($4::text IS NULL OR p.status = $4)
              AND ($5::text IS NULL OR p.invoice_number ILIKE '%' || $5 || '%')
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(query.party)
        .bind(query.payment_status.map(|s| s.as_str()))
        .bind(query.status.map(|s| s.as_str()))
        .bind(&query.search)
        .fetch_all(&self.db)
        .await?;

        Ok(purchases)
    }

    /// Get a purchase by id, with its line items
    pub async fn get(&self, user_id: Uuid, purchase_id: Uuid) -> AppResult<PurchaseWithItems> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT p.id, p.user_id, p.invoice_number, p.reference_number, p.party_id,
                   pt.name AS party_name, p.purchase_date, p.due_date, p.subtotal,
                   p.discount_amount, p.tax_amount, p.shipping_charges, p.other_charges,
                   p.total_amount, p.paid_amount, p.balance_amount, p.payment_status,
                   p.status, p.notes, p.created_at, p.updated_at
            FROM purchases p
            JOIN parties pt ON pt.id = p.party_id
            WHERE p.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(purchase_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let items = self.get_items(purchase_id).await?;

        Ok(PurchaseWithItems { purchase, items })
    }

    /// Partially update purchase header fields
    pub async fn update(
        &self,
        user_id: Uuid,
        purchase_id: Uuid,
        input: UpdatePurchaseInput,
    ) -> AppResult<PurchaseWithItems> {
        let existing = self.get(user_id, purchase_id).await?.purchase;

        let reference_number = input.reference_number.or(existing.reference_number);
        let purchase_date = input.purchase_date.unwrap_or(existing.purchase_date);
        let due_date = input.due_date.or(existing.due_date);
        let status = input
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let notes = input.notes.or(existing.notes);

        sqlx::query(
            r#"
            UPDATE purchases
            SET reference_number = $1, purchase_date = $2, due_date = $3, status = $4,
                notes = $5, updated_at = NOW()
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(&reference_number)
        .bind(purchase_date)
        .bind(due_date)
        .bind(&status)
        .bind(&notes)
        .bind(purchase_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get(user_id, purchase_id).await
    }

    /// Delete a purchase and reverse its stock receipt
    pub async fn delete(&self, user_id: Uuid, purchase_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchases WHERE id = $1 AND user_id = $2)",
        )
        .bind(purchase_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Purchase".to_string()));
        }

        let items = sqlx::query_as::<_, PurchaseItem>(
            r#"
            SELECT id, purchase_id, product_id, product_name, quantity, unit_price,
                   discount, tax_rate, tax_amount, total
            FROM purchase_items
            WHERE purchase_id = $1
            ORDER BY position
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM purchases WHERE id = $1 AND user_id = $2")
            .bind(purchase_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // Reverse the stock received at creation; products deleted since then
        // (product_id nulled) are skipped, matching the original receipt no-op
        for item in &items {
            let Some(product_id) = item.product_id else {
                continue;
            };

            let result = sqlx::query(
                r#"
                UPDATE products
                SET current_stock = current_stock - $1, updated_at = NOW()
                WHERE id = $2 AND user_id = $3 AND current_stock >= $1
                "#,
            )
            .bind(item.quantity)
            .bind(product_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::InsufficientStock(format!(
                    "Cannot delete purchase: reversing {} would make stock for {} negative",
                    item.quantity, item.product_name
                )));
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// Update the paid amount; payment status and balance are recomputed here only
    pub async fn update_payment(
        &self,
        user_id: Uuid,
        purchase_id: Uuid,
        input: UpdatePaymentInput,
    ) -> AppResult<PurchaseWithItems> {
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
            "SELECT total_amount FROM purchases WHERE id = $1 AND user_id = $2",
        )
        .bind(purchase_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let payment_status = PaymentStatus::classify(paid_amount, total_amount);
        let balance = balance_amount(total_amount, paid_amount);

        sqlx::query(
            r#"
            UPDATE purchases
            SET paid_amount = $1, payment_status = $2, balance_amount = $3, updated_at = NOW()
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(paid_amount)
        .bind(payment_status.as_str())
        .bind(balance)
        .bind(purchase_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get(user_id, purchase_id).await
    }

    /// Load line items in invoice order
    async fn get_items(&self, purchase_id: Uuid) -> AppResult<Vec<PurchaseItem>> {
        let items = sqlx::query_as::<_, PurchaseItem>(
            r#"
            SELECT id, purchase_id, product_id, product_name, quantity, unit_price,
                   discount, tax_rate, tax_amount, total
            FROM purchase_items
            WHERE purchase_id = $1
            ORDER BY position
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Validate each line, snapshot the product name, and derive its amounts
    async fn prepare_items(
        &self,
        user_id: Uuid,
        items: &[LineItemInput],
    ) -> AppResult<Vec<PreparedItem>> {
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

            let product_name = sqlx::query_scalar::<_, String>(
                "SELECT name FROM products WHERE id = $1 AND user_id = $2",
            )
            .bind(item.product_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let amounts = compute_line_amounts(item.quantity, item.unit_price, discount, tax_rate);

            prepared.push(PreparedItem {
                product_id: item.product_id,
                product_name,
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
