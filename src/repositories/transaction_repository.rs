use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::transaction_dto::TransactionFilters;
use crate::dto::{page_limit, page_offset};
use crate::models::transaction::Transaction;
use crate::utils::errors::AppError;

pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filters: &TransactionFilters) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::transaction_kind IS NULL OR kind = $1)
              AND ($2::transaction_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR client_id = $3)
              AND ($4::uuid IS NULL OR service_id = $4)
              AND ($5::date IS NULL OR transaction_date >= $5)
              AND ($6::date IS NULL OR transaction_date <= $6)
            ORDER BY created_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(filters.kind)
        .bind(filters.status)
        .bind(filters.client_id)
        .bind(filters.service_id)
        .bind(filters.from)
        .bind(filters.to)
        .bind(page_limit(filters.limit))
        .bind(page_offset(filters.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(transaction)
    }

    pub async fn upsert(&self, transaction: &Transaction) -> Result<Transaction, AppError> {
        Self::upsert_with(&self.pool, transaction).await
    }

    pub async fn upsert_with<'e, E>(executor: E, transaction: &Transaction) -> Result<Transaction, AppError>
    where
        E: PgExecutor<'e>,
    {
        let saved = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                id, kind, status, description, amount, category, client_id, service_id,
                transaction_date, due_date, paid_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                kind = EXCLUDED.kind,
                status = EXCLUDED.status,
                description = EXCLUDED.description,
                amount = EXCLUDED.amount,
                category = EXCLUDED.category,
                client_id = EXCLUDED.client_id,
                service_id = EXCLUDED.service_id,
                transaction_date = EXCLUDED.transaction_date,
                due_date = EXCLUDED.due_date,
                paid_at = EXCLUDED.paid_at,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.kind)
        .bind(transaction.status)
        .bind(&transaction.description)
        .bind(transaction.amount)
        .bind(&transaction.category)
        .bind(transaction.client_id)
        .bind(transaction.service_id)
        .bind(transaction.transaction_date)
        .bind(transaction.due_date)
        .bind(transaction.paid_at)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .fetch_one(executor)
        .await?;

        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
