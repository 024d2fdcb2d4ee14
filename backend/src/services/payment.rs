//! Payment receipt service
//!
//! Receipts record money moving in or out against a party. They are a
//! standalone ledger: recording one does not touch party balances or invoice
//! payment status, both of which change only through their own endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{PaymentMode, PaymentRecordStatus, PaymentReferenceType, PaymentType};
use shared::validation::{validate_amount, validate_required_text};

/// Payment service for receipt records
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

/// Payment receipt record with its party's name
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub receipt_number: String,
    pub party_id: Uuid,
    pub party_name: String,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub reference_type: String,
    pub reference_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_mode: String,
    pub payment_date: NaiveDate,
    pub cheque_number: Option<String>,
    pub cheque_date: Option<NaiveDate>,
    pub bank_name: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a payment receipt
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentInput {
    pub receipt_number: String,
    pub party_id: Uuid,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub reference_type: PaymentReferenceType,
    pub reference_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub payment_date: Option<NaiveDate>,
    pub cheque_number: Option<String>,
    pub cheque_date: Option<NaiveDate>,
    pub bank_name: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub status: Option<PaymentRecordStatus>,
}

/// List filters for payments
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    pub party: Option<Uuid>,
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    pub search: Option<String>,
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a payment receipt
    pub async fn create(&self, user_id: Uuid, input: CreatePaymentInput) -> AppResult<Payment> {
        validate_required_text(&input.receipt_number).map_err(|msg| AppError::Validation {
            field: "receiptNumber".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;

        let party_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM parties WHERE id = $1 AND user_id = $2)",
        )
        .bind(input.party_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if !party_exists {
            return Err(AppError::NotFound("Party".to_string()));
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM payments WHERE user_id = $1 AND receipt_number = $2)",
        )
        .bind(user_id)
        .bind(input.receipt_number.trim())
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("receipt number".to_string()));
        }

        let payment_date = input.payment_date.unwrap_or_else(|| Utc::now().date_naive());

        let payment_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO payments (
                user_id, receipt_number, party_id, payment_type, reference_type,
                reference_id, amount, payment_mode, payment_date, cheque_number,
                cheque_date, bank_name, transaction_id, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(input.receipt_number.trim())
        .bind(input.party_id)
        .bind(input.payment_type.as_str())
        .bind(input.reference_type.as_str())
        .bind(input.reference_id)
        .bind(input.amount)
        .bind(input.payment_mode.as_str())
        .bind(payment_date)
        .bind(&input.cheque_number)
        .bind(input.cheque_date)
        .bind(&input.bank_name)
        .bind(&input.transaction_id)
        .bind(&input.notes)
        .bind(input.status.unwrap_or_default().as_str())
        .fetch_one(&self.db)
        .await?;

        self.get(user_id, payment_id).await
    }

    /// List payments with optional filters; search matches the receipt number
    pub async fn list(&self, user_id: Uuid, query: ListPaymentsQuery) -> AppResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.id, p.user_id, p.receipt_number, p.party_id, pt.name AS party_name,
                   p.payment_type, p.reference_type, p.reference_id, p.amount,
                   p.payment_mode, p.payment_date, p.cheque_number, p.cheque_date,
                   p.bank_name, p.transaction_id, p.notes, p.status,
                   p.created_at, p.updated_at
            FROM payments p
            JOIN parties pt ON pt.id = p.party_id
            WHERE p.user_id = $1
              AND ($2::uuid IS NULL OR p.party_id = $2)
              AND ($3::text IS NULL OR p.payment_type = $3)
              AND ($4::text IS NULL OR p.receipt_number ILIKE '%' || $4 || '%')
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(query.party)
        .bind(query.payment_type.map(|t| t.as_str()))
        .bind(&query.search)
        .fetch_all(&self.db)
        .await?;

        Ok(payments)
    }

    /// Get a payment by id
    pub async fn get(&self, user_id: Uuid, payment_id: Uuid) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.id, p.user_id, p.receipt_number, p.party_id, pt.name AS party_name,
                   p.payment_type, p.reference_type, p.reference_id, p.amount,
                   p.payment_mode, p.payment_date, p.cheque_number, p.cheque_date,
                   p.bank_name, p.transaction_id, p.notes, p.status,
                   p.created_at, p.updated_at
            FROM payments p
            JOIN parties pt ON pt.id = p.party_id
            WHERE p.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(payment_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment".to_string()))?;

        Ok(payment)
    }

    /// Delete a payment
    pub async fn delete(&self, user_id: Uuid, payment_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1 AND user_id = $2")
            .bind(payment_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment".to_string()));
        }

        Ok(())
    }
}
