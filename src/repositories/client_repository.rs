use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::client_dto::ClientFilters;
use crate::dto::{page_limit, page_offset};
use crate::models::client::Client;
use crate::utils::errors::AppError;

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filters: &ClientFilters) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE ($1::client_type IS NULL OR client_type = $1)
              AND ($2::doc_status IS NULL OR doc_status = $2)
              AND (
                $3::text IS NULL
                OR name ILIKE '%' || $3 || '%'
                OR trade_name ILIKE '%' || $3 || '%'
                OR tax_id ILIKE '%' || $3 || '%'
                OR email ILIKE '%' || $3 || '%'
                OR phone ILIKE '%' || $3 || '%'
                OR ($4::text IS NOT NULL
                    AND regexp_replace(coalesce(tax_id, ''), '[^0-9]', '', 'g') LIKE '%' || $4 || '%')
              )
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filters.client_type)
        .bind(filters.doc_status)
        .bind(filters.search_term())
        .bind(filters.search_digits())
        .bind(page_limit(filters.limit))
        .bind(page_offset(filters.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn upsert(&self, client: &Client) -> Result<Client, AppError> {
        let saved = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                id, client_type, name, tax_id, email, phone, secondary_phone,
                zip_code, street, number, complement, neighborhood, city, state,
                rg, birth_date, marital_status, profession, license_number, license_expiration,
                trade_name, contact_name, state_registration,
                notes, avatar_url, doc_status, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20,
                $21, $22, $23,
                $24, $25, $26, $27, $28
            )
            ON CONFLICT (id) DO UPDATE SET
                client_type = EXCLUDED.client_type,
                name = EXCLUDED.name,
                tax_id = EXCLUDED.tax_id,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                secondary_phone = EXCLUDED.secondary_phone,
                zip_code = EXCLUDED.zip_code,
                street = EXCLUDED.street,
                number = EXCLUDED.number,
                complement = EXCLUDED.complement,
                neighborhood = EXCLUDED.neighborhood,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                rg = EXCLUDED.rg,
                birth_date = EXCLUDED.birth_date,
                marital_status = EXCLUDED.marital_status,
                profession = EXCLUDED.profession,
                license_number = EXCLUDED.license_number,
                license_expiration = EXCLUDED.license_expiration,
                trade_name = EXCLUDED.trade_name,
                contact_name = EXCLUDED.contact_name,
                state_registration = EXCLUDED.state_registration,
                notes = EXCLUDED.notes,
                avatar_url = EXCLUDED.avatar_url,
                doc_status = EXCLUDED.doc_status,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(client.client_type)
        .bind(&client.name)
        .bind(&client.tax_id)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.secondary_phone)
        .bind(&client.zip_code)
        .bind(&client.street)
        .bind(&client.number)
        .bind(&client.complement)
        .bind(&client.neighborhood)
        .bind(&client.city)
        .bind(&client.state)
        .bind(&client.rg)
        .bind(client.birth_date)
        .bind(&client.marital_status)
        .bind(&client.profession)
        .bind(&client.license_number)
        .bind(client.license_expiration)
        .bind(&client.trade_name)
        .bind(&client.contact_name)
        .bind(&client.state_registration)
        .bind(&client.notes)
        .bind(&client.avatar_url)
        .bind(client.doc_status)
        .bind(client.created_at)
        .bind(client.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// Vehículos y servicios se borran por ON DELETE CASCADE
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
