//! Trading party service for suppliers, customers, and their running balances

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Address, AdjustmentDirection, PartyType};
use shared::validation::{validate_amount, validate_email, validate_phone, validate_required_text};

/// Party service for managing trading parties
#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
}

/// Party record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub party_type: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<Json<Address>>,
    pub gstin: Option<String>,
    pub pan_number: Option<String>,
    pub opening_balance: Decimal,
    pub current_balance: Decimal,
    pub credit_limit: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a party
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyInput {
    pub name: String,
    #[serde(rename = "type")]
    pub party_type: PartyType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
    pub gstin: Option<String>,
    pub pan_number: Option<String>,
    pub opening_balance: Option<Decimal>,
    pub credit_limit: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Input for updating a party
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartyInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub party_type: Option<PartyType>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
    pub gstin: Option<String>,
    pub pan_number: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Input for the manual balance adjustment endpoint
#[derive(Debug, Deserialize)]
pub struct BalanceAdjustmentInput {
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub direction: Option<AdjustmentDirection>,
}

/// List filters for parties
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPartiesQuery {
    #[serde(rename = "type")]
    pub party_type: Option<PartyType>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl PartyService {
    /// Create a new PartyService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a party; the running balance starts at the opening balance
    pub async fn create(&self, user_id: Uuid, input: CreatePartyInput) -> AppResult<Party> {
        validate_required_text(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(phone) = &input.phone {
            validate_phone(phone).map_err(|msg| AppError::Validation {
                field: "phone".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let opening_balance = input.opening_balance.unwrap_or(Decimal::ZERO);

        let party = sqlx::query_as::<_, Party>(
            r#"
            INSERT INTO parties (
                user_id, name, party_type, phone, email, address, gstin, pan_number,
                opening_balance, current_balance, credit_limit, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10, $11)
            RETURNING id, user_id, name, party_type, phone, email, address, gstin,
                      pan_number, opening_balance, current_balance, credit_limit,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.party_type.as_str())
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.address.map(Json))
        .bind(&input.gstin)
        .bind(&input.pan_number)
        .bind(opening_balance)
        .bind(input.credit_limit.unwrap_or(Decimal::ZERO))
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(&self.db)
        .await?;

        Ok(party)
    }

    /// List parties with optional filters; search matches name or phone
    pub async fn list(&self, user_id: Uuid, query: ListPartiesQuery) -> AppResult<Vec<Party>> {
        let parties = sqlx::query_as::<_, Party>(
            r#"
            SELECT id, user_id, name, party_type, phone, email, address, gstin,
                   pan_number, opening_balance, current_balance, credit_limit,
                   is_active, created_at, updated_at
            FROM parties
            WHERE user_id = $1
              AND ($2::text IS NULL OR party_type = $2)
              AND ($3::boolean IS NULL OR is_active = $3)
              AND ($4::text IS NULL
                   OR name ILIKE '%' || $4 || '%'
                   OR phone ILIKE '%' || $4 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(query.party_type.map(|t| t.as_str()))
        .bind(query.is_active)
        .bind(&query.search)
        .fetch_all(&self.db)
        .await?;

        Ok(parties)
    }

    /// Get a party by id
    pub async fn get(&self, user_id: Uuid, party_id: Uuid) -> AppResult<Party> {
        let party = sqlx::query_as::<_, Party>(
            r#"
            SELECT id, user_id, name, party_type, phone, email, address, gstin,
                   pan_number, opening_balance, current_balance, credit_limit,
                   is_active, created_at, updated_at
            FROM parties
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(party_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Party".to_string()))?;

        Ok(party)
    }

    /// Partially update a party; opening and current balance are not mutable here
    pub async fn update(
        &self,
        user_id: Uuid,
        party_id: Uuid,
        input: UpdatePartyInput,
    ) -> AppResult<Party> {
        let existing = self.get(user_id, party_id).await?;

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
        let phone = input.phone.or(existing.phone);
        if let Some(phone) = &phone {
            validate_phone(phone).map_err(|msg| AppError::Validation {
                field: "phone".to_string(),
                message: msg.to_string(),
            })?;
        }
        let email = input.email.or(existing.email);
        if let Some(email) = &email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let party_type = input
            .party_type
            .map(|t| t.as_str().to_string())
            .unwrap_or(existing.party_type);
        let address = input.address.map(Json).or(existing.address);
        let gstin = input.gstin.or(existing.gstin);
        let pan_number = input.pan_number.or(existing.pan_number);
        let credit_limit = input.credit_limit.unwrap_or(existing.credit_limit);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let party = sqlx::query_as::<_, Party>(
            r#"
            UPDATE parties
            SET name = $1, party_type = $2, phone = $3, email = $4, address = $5,
                gstin = $6, pan_number = $7, credit_limit = $8, is_active = $9,
                updated_at = NOW()
            WHERE id = $10 AND user_id = $11
            RETURNING id, user_id, name, party_type, phone, email, address, gstin,
                      pan_number, opening_balance, current_balance, credit_limit,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&party_type)
        .bind(&phone)
        .bind(&email)
        .bind(&address)
        .bind(&gstin)
        .bind(&pan_number)
        .bind(credit_limit)
        .bind(is_active)
        .bind(party_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(party)
    }

    /// Delete a party; rejected while invoices or payments still reference it
    pub async fn delete(&self, user_id: Uuid, party_id: Uuid) -> AppResult<()> {
        let in_use = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM purchases WHERE party_id = $1)
                OR EXISTS(SELECT 1 FROM sales WHERE party_id = $1)
                OR EXISTS(SELECT 1 FROM payments WHERE party_id = $1)
            "#,
        )
        .bind(party_id)
        .fetch_one(&self.db)
        .await?;

        if in_use {
            return Err(AppError::ValidationError(
                "Party has transactions and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM parties WHERE id = $1 AND user_id = $2")
            .bind(party_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Party".to_string()));
        }

        Ok(())
    }

    /// Manually adjust the running balance (`{amount, type: add|subtract}`)
    pub async fn update_balance(
        &self,
        user_id: Uuid,
        party_id: Uuid,
        input: BalanceAdjustmentInput,
    ) -> AppResult<Party> {
        let (Some(amount), Some(direction)) = (input.amount, input.direction) else {
            return Err(AppError::ValidationError(
                "amount and type (add/subtract) are required".to_string(),
            ));
        };
        validate_amount(amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;

        let existing = self.get(user_id, party_id).await?;

        let new_balance = match direction {
            AdjustmentDirection::Add => existing.current_balance + amount,
            AdjustmentDirection::Subtract => existing.current_balance - amount,
        };

        let party = sqlx::query_as::<_, Party>(
            r#"
            UPDATE parties
            SET current_balance = $1, updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            RETURNING id, user_id, name, party_type, phone, email, address, gstin,
                      pan_number, opening_balance, current_balance, credit_limit,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(new_balance)
        .bind(party_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(party)
    }
}
