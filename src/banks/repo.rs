use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::{AccountType, Currency};

/// A bank account as stored. The derived balance fields are computed per
/// response by the aggregator, never persisted.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bank_name: String,
    pub account_type: AccountType,
    pub initial_balance: f64,
    pub currency: Currency,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated fields for creating or replacing a bank account.
#[derive(Debug, Clone)]
pub struct NewBank {
    pub bank_name: String,
    pub account_type: AccountType,
    pub initial_balance: f64,
    pub currency: Currency,
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Bank>> {
    sqlx::query_as::<_, Bank>(
        "SELECT * FROM banks WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn exists_owned(db: &PgPool, id: Uuid, user_id: Uuid) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM banks WHERE id = $1 AND user_id = $2)",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(db)
    .await
}

pub async fn insert(db: &PgPool, user_id: Uuid, new_bank: &NewBank) -> sqlx::Result<Bank> {
    sqlx::query_as::<_, Bank>(
        r#"
        INSERT INTO banks (user_id, bank_name, account_type, initial_balance, currency)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&new_bank.bank_name)
    .bind(new_bank.account_type)
    .bind(new_bank.initial_balance)
    .bind(new_bank.currency)
    .fetch_one(db)
    .await
}

/// Owner-scoped update; `None` when the bank is absent or owned by someone
/// else (indistinguishable to the caller).
pub async fn update_owned(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    new_bank: &NewBank,
) -> sqlx::Result<Option<Bank>> {
    sqlx::query_as::<_, Bank>(
        r#"
        UPDATE banks
        SET bank_name = $3, account_type = $4, initial_balance = $5, currency = $6,
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&new_bank.bank_name)
    .bind(new_bank.account_type)
    .bind(new_bank.initial_balance)
    .bind(new_bank.currency)
    .fetch_optional(db)
    .await
}

/// Deletes a bank and every transaction referencing it in one SQL
/// transaction, so no orphaned transactions survive a partial failure.
/// Returns the number of cascaded transactions, or `None` when the bank is
/// absent/not owned (everything rolls back).
pub async fn delete_owned_cascading(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> sqlx::Result<Option<u64>> {
    let mut tx = db.begin().await?;

    let cascaded = sqlx::query("DELETE FROM transactions WHERE bank_id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let deleted = sqlx::query("DELETE FROM banks WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    Ok(Some(cascaded))
}
