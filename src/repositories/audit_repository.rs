use sqlx::{PgExecutor, PgPool};

use crate::dto::audit_dto::AuditLogFilters;
use crate::models::audit_log::AuditLog;
use crate::utils::errors::AppError;

/// Sólo inserta y lee: el registro de auditoría nunca se modifica
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, entry: &AuditLog) -> Result<(), AppError> {
        Self::append_with(&self.pool, entry).await
    }

    pub async fn append_with<'e, E>(executor: E, entry: &AuditLog) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, action, entity_type, entity_id, user_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(entry.user_id)
        .bind(&entry.details)
        .bind(entry.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list(&self, filters: &AuditLogFilters) -> Result<Vec<AuditLog>, AppError> {
        let entries = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT * FROM audit_logs
            WHERE ($1::text IS NULL OR entity_type = $1)
              AND ($2::uuid IS NULL OR entity_id = $2)
              AND ($3::text IS NULL OR action = $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(&filters.entity_type)
        .bind(filters.entity_id)
        .bind(&filters.action)
        .bind(filters.effective_limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
