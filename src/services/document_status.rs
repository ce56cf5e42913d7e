//! Clasificador de completitud de documentación
//!
//! Deriva el `DocStatus` de un cliente a partir de qué campos están
//! rellenados. Es una función total: nunca falla y nunca bloquea un guardado.
//!
//! Orden de evaluación:
//! 1. nombre y CPF/CNPJ presentes → COMPLETED (sin mirar nada más);
//! 2. todos los campos relevantes para el tipo vacíos → PENDING;
//! 3. cualquier otro caso → IN_PROGRESS.

use crate::models::client::{Client, ClientType, DocStatus};
use crate::utils::validation::is_blank;

/// Campos de un cliente que participan en la clasificación
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientFields<'a> {
    pub name: Option<&'a str>,
    pub tax_id: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub secondary_phone: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub street: Option<&'a str>,
    pub number: Option<&'a str>,
    pub complement: Option<&'a str>,
    pub neighborhood: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub rg: Option<&'a str>,
    pub has_birth_date: bool,
    pub marital_status: Option<&'a str>,
    pub profession: Option<&'a str>,
    pub license_number: Option<&'a str>,
    pub has_license_expiration: bool,
    pub trade_name: Option<&'a str>,
    pub contact_name: Option<&'a str>,
    pub state_registration: Option<&'a str>,
}

impl<'a> From<&'a Client> for ClientFields<'a> {
    fn from(client: &'a Client) -> Self {
        Self {
            name: client.name.as_deref(),
            tax_id: client.tax_id.as_deref(),
            email: client.email.as_deref(),
            phone: client.phone.as_deref(),
            secondary_phone: client.secondary_phone.as_deref(),
            zip_code: client.zip_code.as_deref(),
            street: client.street.as_deref(),
            number: client.number.as_deref(),
            complement: client.complement.as_deref(),
            neighborhood: client.neighborhood.as_deref(),
            city: client.city.as_deref(),
            state: client.state.as_deref(),
            rg: client.rg.as_deref(),
            has_birth_date: client.birth_date.is_some(),
            marital_status: client.marital_status.as_deref(),
            profession: client.profession.as_deref(),
            license_number: client.license_number.as_deref(),
            has_license_expiration: client.license_expiration.is_some(),
            trade_name: client.trade_name.as_deref(),
            contact_name: client.contact_name.as_deref(),
            state_registration: client.state_registration.as_deref(),
        }
    }
}

impl<'a> ClientFields<'a> {
    fn has_essentials(&self) -> bool {
        !is_blank(self.name) && !is_blank(self.tax_id)
    }

    fn shared(&self) -> [Option<&'a str>; 12] {
        [
            self.name,
            self.tax_id,
            self.email,
            self.phone,
            self.secondary_phone,
            self.zip_code,
            self.street,
            self.number,
            self.complement,
            self.neighborhood,
            self.city,
            self.state,
        ]
    }

    /// True si ningún campo relevante para `client_type` tiene contenido
    fn is_empty_for(&self, client_type: ClientType) -> bool {
        let shared_empty = self.shared().iter().all(|field| is_blank(*field));
        if !shared_empty {
            return false;
        }

        match client_type {
            ClientType::Individual => {
                [self.rg, self.marital_status, self.profession, self.license_number]
                    .iter()
                    .all(|field| is_blank(*field))
                    && !self.has_birth_date
                    && !self.has_license_expiration
            }
            ClientType::Company => [self.trade_name, self.contact_name, self.state_registration]
                .iter()
                .all(|field| is_blank(*field)),
        }
    }
}

/// Clasifica la completitud a partir de los campos y el tipo de cliente
pub fn classify(fields: &ClientFields<'_>, client_type: ClientType) -> DocStatus {
    if fields.has_essentials() {
        return DocStatus::Completed;
    }
    if fields.is_empty_for(client_type) {
        return DocStatus::Pending;
    }
    DocStatus::InProgress
}

/// Atajo sobre un `Client` completo
pub fn classify_client(client: &Client) -> DocStatus {
    classify(&ClientFields::from(client), client.client_type)
}

/// Recalcula y sobrescribe `doc_status`; se llama en todas las rutas de escritura
pub fn refresh_doc_status(client: &mut Client) {
    client.doc_status = classify_client(client);
}
