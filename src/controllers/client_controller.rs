use std::sync::Arc;

use axum::body::Bytes;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::client_dto::{ClientFilters, ClientRequest, ClientResponse};
use crate::dto::ApiResponse;
use crate::models::{Actor, AuditAction, Client, EntityType};
use crate::repositories::DataStore;
use crate::services::document_status::refresh_doc_status;
use crate::services::expiration_alerts;
use crate::services::storage_service::{avatar_path, image_extension, StorageBackend};
use crate::services::AuditService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{clean_optional, validate_tax_id, FieldErrors};

pub struct ClientController {
    store: Arc<dyn DataStore>,
    storage: Arc<dyn StorageBackend>,
    today: NaiveDate,
    alert_window_days: i64,
}

impl ClientController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            storage: state.storage.clone(),
            today: state.today(),
            alert_window_days: state.config.alert_window_days,
        }
    }

    fn to_response(&self, client: Client) -> ClientResponse {
        let license_alert =
            expiration_alerts::classify(client.license_expiration, self.today, self.alert_window_days);
        ClientResponse {
            client,
            license_alert,
        }
    }

    async fn find(&self, id: Uuid) -> Result<Client, AppError> {
        self.store
            .find_client(id)
            .await?
            .ok_or_else(|| not_found_error("Client", &id.to_string()))
    }

    pub async fn list(&self, filters: ClientFilters) -> Result<Vec<ClientResponse>, AppError> {
        let clients = self.store.list_clients(&filters).await?;
        Ok(clients.into_iter().map(|c| self.to_response(c)).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ClientResponse, AppError> {
        let client = self.find(id).await?;
        Ok(self.to_response(client))
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: ClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        validate_request(&request)?;

        let mut client = Client::new(request.client_type);
        apply_request(&mut client, request);
        refresh_doc_status(&mut client);

        let client = self.store.upsert_client(&client).await?;
        info!("✅ Cliente creado: {} ({:?})", client.id, client.doc_status);

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ClientCreated,
                EntityType::Client,
                client.id,
                json!({ "name": client.display_name(), "doc_status": client.doc_status }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.to_response(client),
            "Cliente criado com sucesso",
        ))
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        request: ClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        validate_request(&request)?;

        let mut client = self.find(id).await?;
        let previous_status = client.doc_status;
        apply_request(&mut client, request);
        refresh_doc_status(&mut client);
        client.updated_at = Utc::now();

        let client = self.store.upsert_client(&client).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ClientUpdated,
                EntityType::Client,
                client.id,
                json!({ "doc_status_from": previous_status, "doc_status_to": client.doc_status }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.to_response(client),
            "Cliente atualizado com sucesso",
        ))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let client = self.find(id).await?;
        if !self.store.delete_client(id).await? {
            return Err(not_found_error("Client", &id.to_string()));
        }
        info!("🗑️ Cliente eliminado: {}", id);

        if let Some(path) = client.avatar_url.as_deref().and_then(|url| self.storage.path_from_url(url)) {
            if let Err(e) = self.storage.delete(&path).await {
                warn!("⚠️ Avatar huérfano {}: {}", path, e);
            }
        }

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ClientDeleted,
                EntityType::Client,
                id,
                json!({ "name": client.display_name() }),
            )
            .await?;

        Ok(ApiResponse::message("Cliente excluído com sucesso"))
    }

    /// Sube el avatar y actualiza la fila. Si la fila no se puede actualizar
    /// se borra el archivo subido; si tampoco eso funciona, `PartialWorkflow`.
    pub async fn upload_avatar(
        &self,
        actor: &Actor,
        id: Uuid,
        content_type: &str,
        content: Bytes,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        if content.is_empty() {
            return Err(AppError::BadRequest("Arquivo vazio".to_string()));
        }
        let extension = image_extension(content_type)?;
        let mut client = self.find(id).await?;

        let path = avatar_path(client.id, extension);
        let url = self.storage.upload(&path, content, content_type).await?;

        let previous = client.avatar_url.replace(url);
        client.updated_at = Utc::now();

        let client = match self.store.upsert_client(&client).await {
            Ok(saved) => saved,
            Err(e) => {
                error!("❌ No se pudo guardar el avatar de {}: {}", id, e);
                if let Err(cleanup) = self.storage.delete(&path).await {
                    return Err(AppError::PartialWorkflow(format!(
                        "Avatar subido en '{}' pero el cliente no se actualizó ({}) y el archivo no pudo borrarse ({})",
                        path, e, cleanup
                    )));
                }
                return Err(e);
            }
        };

        if let Some(old_path) = previous.as_deref().and_then(|url| self.storage.path_from_url(url)) {
            if let Err(e) = self.storage.delete(&old_path).await {
                warn!("⚠️ Avatar anterior huérfano {}: {}", old_path, e);
            }
        }

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ClientUpdated,
                EntityType::Client,
                client.id,
                json!({ "avatar_url": client.avatar_url }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.to_response(client),
            "Foto atualizada com sucesso",
        ))
    }
}

fn validate_request(request: &ClientRequest) -> Result<(), AppError> {
    request.validate()?;

    let mut errors = FieldErrors::new();
    if let Some(tax_id) = request.tax_id.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        errors.check("tax_id", validate_tax_id(tax_id));
    }
    errors.finish()
}

/// El formulario envía el registro completo: cada campo se reemplaza
fn apply_request(client: &mut Client, request: ClientRequest) {
    client.client_type = request.client_type;
    client.name = clean_optional(request.name);
    client.tax_id = clean_optional(request.tax_id);
    client.email = clean_optional(request.email);
    client.phone = clean_optional(request.phone);
    client.secondary_phone = clean_optional(request.secondary_phone);
    client.zip_code = clean_optional(request.zip_code);
    client.street = clean_optional(request.street);
    client.number = clean_optional(request.number);
    client.complement = clean_optional(request.complement);
    client.neighborhood = clean_optional(request.neighborhood);
    client.city = clean_optional(request.city);
    client.state = clean_optional(request.state).map(|s| s.to_uppercase());
    client.rg = clean_optional(request.rg);
    client.birth_date = request.birth_date;
    client.marital_status = clean_optional(request.marital_status);
    client.profession = clean_optional(request.profession);
    client.license_number = clean_optional(request.license_number);
    client.license_expiration = request.license_expiration;
    client.trade_name = clean_optional(request.trade_name);
    client.contact_name = clean_optional(request.contact_name);
    client.state_registration = clean_optional(request.state_registration);
    client.notes = clean_optional(request.notes);
}
