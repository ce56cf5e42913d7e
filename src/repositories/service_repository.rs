use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::service_dto::ServiceFilters;
use crate::dto::{page_limit, page_offset};
use crate::models::service::Service;
use crate::utils::errors::AppError;

pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filters: &ServiceFilters) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT * FROM services
            WHERE ($1::service_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
              AND ($3::uuid IS NULL OR vehicle_id = $3)
              AND (
                $4::text IS NULL
                OR service_type ILIKE '%' || $4 || '%'
                OR agent_name ILIKE '%' || $4 || '%'
                OR notes ILIKE '%' || $4 || '%'
              )
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filters.status)
        .bind(filters.client_id)
        .bind(filters.vehicle_id)
        .bind(filters.search_term())
        .bind(page_limit(filters.limit))
        .bind(page_offset(filters.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    pub async fn upsert(&self, service: &Service) -> Result<Service, AppError> {
        Self::upsert_with(&self.pool, service).await
    }

    /// Variante que acepta una transacción abierta
    pub async fn upsert_with<'e, E>(executor: E, service: &Service) -> Result<Service, AppError>
    where
        E: PgExecutor<'e>,
    {
        let saved = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (
                id, client_id, vehicle_id, service_type, status, due_date, price,
                payer_id, agent_name, detran_schedule, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                client_id = EXCLUDED.client_id,
                vehicle_id = EXCLUDED.vehicle_id,
                service_type = EXCLUDED.service_type,
                status = EXCLUDED.status,
                due_date = EXCLUDED.due_date,
                price = EXCLUDED.price,
                payer_id = EXCLUDED.payer_id,
                agent_name = EXCLUDED.agent_name,
                detran_schedule = EXCLUDED.detran_schedule,
                notes = EXCLUDED.notes,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(service.id)
        .bind(service.client_id)
        .bind(service.vehicle_id)
        .bind(&service.service_type)
        .bind(service.status)
        .bind(service.due_date)
        .bind(service.price)
        .bind(service.payer_id)
        .bind(&service.agent_name)
        .bind(&service.detran_schedule)
        .bind(&service.notes)
        .bind(service.created_at)
        .bind(service.updated_at)
        .fetch_one(executor)
        .await?;

        Ok(saved)
    }

    /// El checklist cae por cascada; las transacciones quedan sin servicio
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
