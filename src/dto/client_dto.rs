use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::client::{Client, ClientType, DocStatus};
use crate::services::expiration_alerts::ExpirationStatus;
use crate::utils::validation::digits_only;

// Request para crear o editar un cliente (el formulario envía el registro completo)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientRequest {
    pub client_type: ClientType,

    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub tax_id: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 30))]
    pub secondary_phone: Option<String>,
    #[validate(length(max = 10))]
    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 2))]
    pub state: Option<String>,

    pub rg: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub marital_status: Option<String>,
    pub profession: Option<String>,
    pub license_number: Option<String>,
    pub license_expiration: Option<NaiveDate>,

    #[validate(length(max = 255))]
    pub trade_name: Option<String>,
    pub contact_name: Option<String>,
    pub state_registration: Option<String>,

    pub notes: Option<String>,
}

// Filtros para búsqueda de clientes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilters {
    pub search: Option<String>,
    pub client_type: Option<ClientType>,
    pub doc_status: Option<DocStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ClientFilters {
    /// Misma semántica que el WHERE de `ClientRepository::list`
    pub fn matches(&self, client: &Client) -> bool {
        if self.client_type.map_or(false, |t| t != client.client_type) {
            return false;
        }
        if self.doc_status.map_or(false, |s| s != client.doc_status) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                let text_match = [
                    client.name.as_deref(),
                    client.trade_name.as_deref(),
                    client.tax_id.as_deref(),
                    client.email.as_deref(),
                    client.phone.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle));

                text_match
                    || self.search_digits().map_or(false, |digits| {
                        client
                            .tax_id
                            .as_deref()
                            .map_or(false, |tax_id| digits_only(tax_id).contains(&digits))
                    })
            }
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Dígitos del término de búsqueda, para buscar CPF/CNPJ sin puntuación
    pub fn search_digits(&self) -> Option<String> {
        self.search_term()
            .map(digits_only)
            .filter(|digits| !digits.is_empty())
    }
}

// Response de cliente con la alerta de CNH calculada en lectura
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    #[serde(flatten)]
    pub client: Client,
    pub license_alert: ExpirationStatus,
}
