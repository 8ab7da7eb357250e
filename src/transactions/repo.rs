use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::model::{Category, TransactionType};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bank_id: Uuid,
    pub amount: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    pub date: Date,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A transaction joined with the display name of its bank account, as
/// listed and exported.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithBank {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bank_id: Uuid,
    pub bank_name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    pub date: Date,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated fields for creating or replacing a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub bank_id: Uuid,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub date: Date,
    pub description: String,
}

/// Validated list filters; all optional except the pagination window.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub bank_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
    pub category: Option<Category>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, user_id: Uuid, filter: &TransactionFilter) {
    builder.push(" WHERE t.user_id = ");
    builder.push_bind(user_id);
    if let Some(bank_id) = filter.bank_id {
        builder.push(" AND t.bank_id = ");
        builder.push_bind(bank_id);
    }
    if let Some(transaction_type) = filter.transaction_type {
        builder.push(" AND t.type = ");
        builder.push_bind(transaction_type);
    }
    if let Some(category) = filter.category {
        builder.push(" AND t.category = ");
        builder.push_bind(category);
    }
    if let Some(date_from) = filter.date_from {
        builder.push(" AND t.date >= ");
        builder.push_bind(date_from);
    }
    if let Some(date_to) = filter.date_to {
        builder.push(" AND t.date <= ");
        builder.push_bind(date_to);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        builder.push(" AND (t.description ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR t.category ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

pub async fn list_filtered(
    db: &PgPool,
    user_id: Uuid,
    filter: &TransactionFilter,
) -> sqlx::Result<Vec<TransactionWithBank>> {
    let mut builder = QueryBuilder::new(
        "SELECT t.*, b.bank_name FROM transactions t JOIN banks b ON b.id = t.bank_id",
    );
    push_filters(&mut builder, user_id, filter);
    builder.push(" ORDER BY t.date DESC, t.created_at DESC");
    builder.push(" LIMIT ");
    builder.push_bind(filter.limit);
    builder.push(" OFFSET ");
    builder.push_bind((filter.page - 1) * filter.limit);

    builder
        .build_query_as::<TransactionWithBank>()
        .fetch_all(db)
        .await
}

pub async fn count_filtered(
    db: &PgPool,
    user_id: Uuid,
    filter: &TransactionFilter,
) -> sqlx::Result<i64> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM transactions t");
    push_filters(&mut builder, user_id, filter);
    builder.build_query_scalar::<i64>().fetch_one(db).await
}

/// The user's full transaction log, for balance annotation.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Transaction>> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(db)
        .await
}

pub async fn list_by_bank(db: &PgPool, bank_id: Uuid) -> sqlx::Result<Vec<Transaction>> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE bank_id = $1")
        .bind(bank_id)
        .fetch_all(db)
        .await
}

/// Transactions inside one calendar-month window, for the monthly analytics.
pub async fn list_in_window(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> sqlx::Result<Vec<Transaction>> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE user_id = $1 AND date >= $2 AND date <= $3",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
}

/// Every transaction of the user with its bank name, newest first — the
/// export dataset.
pub async fn list_for_export(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<TransactionWithBank>> {
    sqlx::query_as::<_, TransactionWithBank>(
        r#"
        SELECT t.*, b.bank_name
        FROM transactions t
        JOIN banks b ON b.id = t.bank_id
        WHERE t.user_id = $1
        ORDER BY t.date DESC, t.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    new_transaction: &NewTransaction,
) -> sqlx::Result<Transaction> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (user_id, bank_id, amount, type, category, date, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(new_transaction.bank_id)
    .bind(new_transaction.amount)
    .bind(new_transaction.transaction_type)
    .bind(new_transaction.category)
    .bind(new_transaction.date)
    .bind(&new_transaction.description)
    .fetch_one(db)
    .await
}

pub async fn update_owned(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    new_transaction: &NewTransaction,
) -> sqlx::Result<Option<Transaction>> {
    sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET bank_id = $3, amount = $4, type = $5, category = $6, date = $7, description = $8,
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(new_transaction.bank_id)
    .bind(new_transaction.amount)
    .bind(new_transaction.transaction_type)
    .bind(new_transaction.category)
    .bind(new_transaction.date)
    .bind(&new_transaction.description)
    .fetch_optional(db)
    .await
}

pub async fn delete_owned(db: &PgPool, id: Uuid, user_id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
