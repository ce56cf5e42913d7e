//! Modelo de Client
//!
//! Cliente persona física (INDIVIDUAL) o jurídica (COMPANY). El campo
//! `doc_status` es derivado: se recalcula en cada escritura con
//! `services::document_status::classify_client`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de cliente - mapea al ENUM client_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "client_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Individual,
    Company,
}

/// Completitud del registro - mapea al ENUM doc_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "doc_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocStatus {
    Pending,
    InProgress,
    Completed,
}

/// Client principal - mapea a la tabla clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Client {
    pub id: Uuid,
    pub client_type: ClientType,
    /// Nombre completo o razón social
    pub name: Option<String>,
    /// CPF o CNPJ
    pub tax_id: Option<String>,

    // Contacto
    pub email: Option<String>,
    pub phone: Option<String>,
    pub secondary_phone: Option<String>,
    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,

    // Persona física
    pub rg: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub marital_status: Option<String>,
    pub profession: Option<String>,
    pub license_number: Option<String>,
    pub license_expiration: Option<NaiveDate>,

    // Persona jurídica
    pub trade_name: Option<String>,
    pub contact_name: Option<String>,
    pub state_registration: Option<String>,

    pub notes: Option<String>,
    pub avatar_url: Option<String>,
    pub doc_status: DocStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Cliente vacío del tipo indicado, con `doc_status` PENDING
    pub fn new(client_type: ClientType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_type,
            name: None,
            tax_id: None,
            email: None,
            phone: None,
            secondary_phone: None,
            zip_code: None,
            street: None,
            number: None,
            complement: None,
            neighborhood: None,
            city: None,
            state: None,
            rg: None,
            birth_date: None,
            marital_status: None,
            profession: None,
            license_number: None,
            license_expiration: None,
            trade_name: None,
            contact_name: None,
            state_registration: None,
            notes: None,
            avatar_url: None,
            doc_status: DocStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Nombre para listados y alertas
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.trade_name.clone())
            .unwrap_or_else(|| "(sem nome)".to_string())
    }
}
