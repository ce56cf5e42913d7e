use std::sync::Arc;

use axum::body::Bytes;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, TransferResponse, TransferVehicleRequest, VehicleFields, VehicleFilters,
    VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::models::{Actor, AuditAction, EntityType, Vehicle, MAX_VEHICLE_IMAGES};
use crate::repositories::DataStore;
use crate::services::expiration_alerts;
use crate::services::storage_service::{image_extension, vehicle_image_path, StorageBackend};
use crate::services::vehicle_transfer::plan_transfer;
use crate::services::AuditService;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::{
    clean_optional, digits_only, normalize_plate, validate_chassis, validate_plate, validate_renavam,
    FieldErrors,
};

pub struct VehicleController {
    store: Arc<dyn DataStore>,
    storage: Arc<dyn StorageBackend>,
    today: NaiveDate,
    alert_window_days: i64,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            storage: state.storage.clone(),
            today: state.today(),
            alert_window_days: state.config.alert_window_days,
        }
    }

    fn to_response(&self, vehicle: Vehicle) -> VehicleResponse {
        let licensing_alert =
            expiration_alerts::classify(vehicle.licensing_expiration, self.today, self.alert_window_days);
        VehicleResponse {
            vehicle,
            licensing_alert,
        }
    }

    async fn find(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    async fn ensure_plate_available(&self, plate: &str, vehicle_id: Uuid) -> Result<(), AppError> {
        match self.store.find_vehicle_by_plate(plate).await? {
            Some(existing) if existing.id != vehicle_id => Err(conflict_error("Vehicle", "plate", plate)),
            _ => Ok(()),
        }
    }

    pub async fn list(&self, filters: VehicleFilters) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.store.list_vehicles(&filters).await?;
        Ok(vehicles.into_iter().map(|v| self.to_response(v)).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self.find(id).await?;
        Ok(self.to_response(vehicle))
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        validate_fields(&request.fields)?;

        if self.store.find_client(request.owner_id).await?.is_none() {
            return Err(not_found_error("Client", &request.owner_id.to_string()));
        }

        let mut vehicle = Vehicle::new(request.owner_id, String::new());
        apply_fields(&mut vehicle, request.fields);
        self.ensure_plate_available(&vehicle.plate, vehicle.id).await?;

        let vehicle = self.store.upsert_vehicle(&vehicle).await?;
        info!("✅ Vehículo creado: {} ({})", vehicle.plate, vehicle.id);

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::VehicleCreated,
                EntityType::Vehicle,
                vehicle.id,
                json!({ "plate": vehicle.plate, "owner_id": vehicle.owner_id }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.to_response(vehicle),
            "Veículo cadastrado com sucesso",
        ))
    }

    /// El propietario no se edita aquí: sólo cambia por transferencia
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        fields: VehicleFields,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        validate_fields(&fields)?;

        let mut vehicle = self.find(id).await?;
        apply_fields(&mut vehicle, fields);
        self.ensure_plate_available(&vehicle.plate, vehicle.id).await?;
        vehicle.updated_at = Utc::now();

        let vehicle = self.store.upsert_vehicle(&vehicle).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::VehicleUpdated,
                EntityType::Vehicle,
                vehicle.id,
                json!({ "plate": vehicle.plate }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.to_response(vehicle),
            "Veículo atualizado com sucesso",
        ))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let vehicle = self.find(id).await?;
        if !self.store.delete_vehicle(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        info!("🗑️ Vehículo eliminado: {}", vehicle.plate);

        for url in &vehicle.images {
            if let Some(path) = self.storage.path_from_url(url) {
                if let Err(e) = self.storage.delete(&path).await {
                    warn!("⚠️ Imagen huérfana {}: {}", path, e);
                }
            }
        }

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::VehicleDeleted,
                EntityType::Vehicle,
                id,
                json!({ "plate": vehicle.plate }),
            )
            .await?;

        Ok(ApiResponse::message("Veículo excluído com sucesso"))
    }

    /// Agrega una imagen (máximo 4). Mismo esquema que el avatar de cliente:
    /// si la fila no se actualiza se borra el archivo subido.
    pub async fn add_image(
        &self,
        actor: &Actor,
        id: Uuid,
        content_type: &str,
        content: Bytes,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        if content.is_empty() {
            return Err(AppError::BadRequest("Arquivo vazio".to_string()));
        }
        let extension = image_extension(content_type)?;
        let mut vehicle = self.find(id).await?;
        if !vehicle.can_add_image() {
            return Err(AppError::BadRequest(format!(
                "O veículo já possui o máximo de {} imagens",
                MAX_VEHICLE_IMAGES
            )));
        }

        let path = vehicle_image_path(vehicle.id, extension);
        let url = self.storage.upload(&path, content, content_type).await?;
        vehicle.images.push(url.clone());
        vehicle.updated_at = Utc::now();

        let vehicle = match self.store.upsert_vehicle(&vehicle).await {
            Ok(saved) => saved,
            Err(e) => {
                error!("❌ No se pudo registrar la imagen de {}: {}", id, e);
                if let Err(cleanup) = self.storage.delete(&path).await {
                    return Err(AppError::PartialWorkflow(format!(
                        "Imagem enviada em '{}' mas o veículo não foi atualizado ({}) e o arquivo não pôde ser removido ({})",
                        path, e, cleanup
                    )));
                }
                return Err(e);
            }
        };

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::VehicleUpdated,
                EntityType::Vehicle,
                vehicle.id,
                json!({ "image_added": url }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.to_response(vehicle),
            "Imagem adicionada com sucesso",
        ))
    }

    pub async fn remove_image(
        &self,
        actor: &Actor,
        id: Uuid,
        index: usize,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let mut vehicle = self.find(id).await?;
        if index >= vehicle.images.len() {
            return Err(AppError::NotFound(format!(
                "Imagem {} não encontrada no veículo {}",
                index, vehicle.plate
            )));
        }

        let url = vehicle.images.remove(index);
        vehicle.updated_at = Utc::now();
        let vehicle = self.store.upsert_vehicle(&vehicle).await?;

        // la fila ya no la referencia; un archivo que no se borra sólo queda huérfano
        if let Some(path) = self.storage.path_from_url(&url) {
            if let Err(e) = self.storage.delete(&path).await {
                warn!("⚠️ Imagen huérfana {}: {}", path, e);
            }
        }

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::VehicleUpdated,
                EntityType::Vehicle,
                vehicle.id,
                json!({ "image_removed": url }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.to_response(vehicle),
            "Imagem removida com sucesso",
        ))
    }

    /// Transferencia: servicio + cobro + cambio de propietario + auditoría, en una unidad
    pub async fn transfer(
        &self,
        actor: &Actor,
        id: Uuid,
        request: TransferVehicleRequest,
    ) -> Result<ApiResponse<TransferResponse>, AppError> {
        request.validate()?;

        let vehicle = self.find(id).await?;
        let (seller, new_owner) = futures::try_join!(
            self.store.find_client(request.seller_id),
            self.store.find_client(request.new_owner_id),
        )?;
        let seller = seller.ok_or_else(|| not_found_error("Client", &request.seller_id.to_string()))?;
        let new_owner =
            new_owner.ok_or_else(|| not_found_error("Client", &request.new_owner_id.to_string()))?;

        let plan = plan_transfer(&vehicle, &seller, &new_owner, &request, actor, self.today)?;
        self.store.commit_transfer(&plan).await?;

        info!(
            "🔄 Vehículo {} transferido: {} → {}",
            vehicle.plate,
            seller.display_name(),
            new_owner.display_name()
        );

        let vehicle = self.find(id).await?;
        let response = TransferResponse {
            vehicle,
            service: plan.service,
            transaction: plan.transaction,
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Transferência registrada com sucesso",
        ))
    }
}

fn validate_fields(fields: &VehicleFields) -> Result<(), AppError> {
    fields.validate()?;

    let mut errors = FieldErrors::new();
    errors.check("plate", validate_plate(&fields.plate));
    if let Some(chassis) = fields.chassis.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        errors.check("chassis", validate_chassis(chassis));
    }
    if let Some(renavam) = fields.renavam.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        errors.check("renavam", validate_renavam(renavam));
    }
    errors.finish()
}

fn apply_fields(vehicle: &mut Vehicle, fields: VehicleFields) {
    vehicle.plate = normalize_plate(&fields.plate);
    vehicle.chassis = clean_optional(fields.chassis).map(|c| c.to_uppercase());
    vehicle.renavam = clean_optional(fields.renavam).map(|r| digits_only(&r));
    vehicle.brand = clean_optional(fields.brand);
    vehicle.model = clean_optional(fields.model);
    vehicle.manufacture_year = fields.manufacture_year;
    vehicle.model_year = fields.model_year;
    vehicle.color = clean_optional(fields.color);
    vehicle.fuel_type = clean_optional(fields.fuel_type);
    vehicle.category = clean_optional(fields.category);
    vehicle.licensing_expiration = fields.licensing_expiration;
    vehicle.notes = clean_optional(fields.notes);
}
