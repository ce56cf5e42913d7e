use chrono::Utc;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleFilters;
use crate::dto::{page_limit, page_offset};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::normalize_plate;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let search = filters.search_term();
        let plate_search = search.map(normalize_plate).filter(|p| !p.is_empty());

        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND (
                $2::text IS NULL
                OR ($3::text IS NOT NULL AND plate LIKE '%' || $3 || '%')
                OR chassis ILIKE '%' || $2 || '%'
                OR renavam ILIKE '%' || $2 || '%'
                OR brand ILIKE '%' || $2 || '%'
                OR model ILIKE '%' || $2 || '%'
              )
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filters.owner_id)
        .bind(search)
        .bind(plate_search)
        .bind(page_limit(filters.limit))
        .bind(page_offset(filters.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE plate = $1")
            .bind(plate)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Inserta o actualiza. En filas existentes `owner_id` no se toca:
    /// sólo cambia con `transfer_owner_with`.
    pub async fn upsert(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let saved = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, owner_id, plate, chassis, renavam, brand, model,
                manufacture_year, model_year, color, fuel_type, category,
                images, licensing_expiration, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (id) DO UPDATE SET
                plate = EXCLUDED.plate,
                chassis = EXCLUDED.chassis,
                renavam = EXCLUDED.renavam,
                brand = EXCLUDED.brand,
                model = EXCLUDED.model,
                manufacture_year = EXCLUDED.manufacture_year,
                model_year = EXCLUDED.model_year,
                color = EXCLUDED.color,
                fuel_type = EXCLUDED.fuel_type,
                category = EXCLUDED.category,
                images = EXCLUDED.images,
                licensing_expiration = EXCLUDED.licensing_expiration,
                notes = EXCLUDED.notes,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.owner_id)
        .bind(&vehicle.plate)
        .bind(&vehicle.chassis)
        .bind(&vehicle.renavam)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.manufacture_year)
        .bind(vehicle.model_year)
        .bind(&vehicle.color)
        .bind(&vehicle.fuel_type)
        .bind(&vehicle.category)
        .bind(&vehicle.images)
        .bind(vehicle.licensing_expiration)
        .bind(&vehicle.notes)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                conflict_error("Vehicle", "plate", &vehicle.plate)
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                not_found_error("Client", &vehicle.owner_id.to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(saved)
    }

    /// Cambia el propietario sólo si sigue siendo `seller_id`.
    /// Devuelve false si el vehículo ya no pertenece al vendedor.
    pub async fn transfer_owner_with<'e, E>(
        executor: E,
        vehicle_id: Uuid,
        seller_id: Uuid,
        new_owner_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET owner_id = $3, updated_at = $4
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(vehicle_id)
        .bind(seller_id)
        .bind(new_owner_id)
        .bind(Utc::now())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
