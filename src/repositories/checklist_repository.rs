use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::checklist::ServiceChecklistItem;
use crate::utils::errors::{not_found_error, AppError};

pub struct ChecklistRepository {
    pool: PgPool,
}

impl ChecklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_service(&self, service_id: Uuid) -> Result<Vec<ServiceChecklistItem>, AppError> {
        let items = sqlx::query_as::<_, ServiceChecklistItem>(
            r#"
            SELECT * FROM service_checklist_items
            WHERE service_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceChecklistItem>, AppError> {
        let item = sqlx::query_as::<_, ServiceChecklistItem>(
            "SELECT * FROM service_checklist_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn upsert(&self, item: &ServiceChecklistItem) -> Result<ServiceChecklistItem, AppError> {
        Self::upsert_with(&self.pool, item).await
    }

    pub async fn upsert_with<'e, E>(
        executor: E,
        item: &ServiceChecklistItem,
    ) -> Result<ServiceChecklistItem, AppError>
    where
        E: PgExecutor<'e>,
    {
        let saved = sqlx::query_as::<_, ServiceChecklistItem>(
            r#"
            INSERT INTO service_checklist_items (
                id, service_id, description, completed, position, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                description = EXCLUDED.description,
                completed = EXCLUDED.completed,
                position = EXCLUDED.position,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(item.service_id)
        .bind(&item.description)
        .bind(item.completed)
        .bind(item.position)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                not_found_error("Service", &item.service_id.to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM service_checklist_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
