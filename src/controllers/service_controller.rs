use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::future::try_join_all;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::service_dto::{
    ChecklistItemRequest, CreatedServiceResponse, ServiceDetailResponse, ServiceFilters,
    ServiceRequest, ServiceResponse, ToggleChecklistItemRequest, UpdateServiceStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::{
    Actor, AuditAction, AuditLog, EntityType, Service, ServiceChecklistItem, Vehicle,
};
use crate::repositories::{DataStore, ServiceBundle};
use crate::services::checklist_templates::{self, normalize_service_type};
use crate::services::service_billing::billing_transaction;
use crate::services::service_progress::checklist_progress;
use crate::services::AuditService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{clean_optional, validate_money_scale, validate_non_negative, FieldErrors};

pub struct ServiceController {
    store: Arc<dyn DataStore>,
    today: NaiveDate,
}

impl ServiceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            today: state.today(),
        }
    }

    async fn find(&self, id: Uuid) -> Result<Service, AppError> {
        self.store
            .find_service(id)
            .await?
            .ok_or_else(|| not_found_error("Service", &id.to_string()))
    }

    async fn find_item(&self, service_id: Uuid, item_id: Uuid) -> Result<ServiceChecklistItem, AppError> {
        self.store
            .find_checklist_item(item_id)
            .await?
            .filter(|item| item.service_id == service_id)
            .ok_or_else(|| not_found_error("ChecklistItem", &item_id.to_string()))
    }

    /// Cliente, vehículo y pagador deben existir
    async fn check_references(&self, request: &ServiceRequest) -> Result<Vehicle, AppError> {
        if self.store.find_client(request.client_id).await?.is_none() {
            return Err(not_found_error("Client", &request.client_id.to_string()));
        }
        if let Some(payer_id) = request.payer_id {
            if self.store.find_client(payer_id).await?.is_none() {
                return Err(not_found_error("Client", &payer_id.to_string()));
            }
        }
        self.store
            .find_vehicle(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.vehicle_id.to_string()))
    }

    async fn detail(&self, service: Service) -> Result<ServiceDetailResponse, AppError> {
        let checklist = self.store.list_checklist_items(service.id).await?;
        Ok(ServiceDetailResponse {
            progress: checklist_progress(&checklist),
            service,
            checklist,
        })
    }

    pub async fn list(&self, filters: ServiceFilters) -> Result<Vec<ServiceResponse>, AppError> {
        let services = self.store.list_services(&filters).await?;
        let checklists = try_join_all(
            services
                .iter()
                .map(|service| self.store.list_checklist_items(service.id)),
        )
        .await?;

        Ok(services
            .into_iter()
            .zip(checklists)
            .map(|(service, checklist)| ServiceResponse {
                progress: checklist_progress(&checklist),
                service,
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ServiceDetailResponse, AppError> {
        let service = self.find(id).await?;
        self.detail(service).await
    }

    /// Alta de servicio: checklist de la plantilla y cobro pendiente si tiene precio
    pub async fn create(
        &self,
        actor: &Actor,
        request: ServiceRequest,
    ) -> Result<ApiResponse<CreatedServiceResponse>, AppError> {
        validate_request(&request)?;
        let vehicle = self.check_references(&request).await?;

        let mut service = Service::new(
            request.client_id,
            request.vehicle_id,
            normalize_service_type(&request.service_type),
            request.price,
        );
        apply_request(&mut service, request);

        let checklist = checklist_templates::instantiate(service.id, &service.service_type);
        let transaction = billing_transaction(&service, &vehicle, self.today);
        let audit = AuditLog::new(
            AuditAction::ServiceCreated,
            EntityType::Service,
            service.id,
            actor.user_id,
            json!({
                "service_type": service.service_type,
                "plate": vehicle.plate,
                "price": service.price.to_string(),
                "transaction_id": transaction.as_ref().map(|t| t.id),
            }),
        );

        let bundle = ServiceBundle {
            service,
            checklist,
            transaction,
            audit,
        };
        self.store.commit_service(&bundle).await?;
        info!("✅ Servicio {} creado para {}", bundle.service.service_type, vehicle.plate);

        let ServiceBundle {
            service,
            checklist,
            transaction,
            ..
        } = bundle;

        Ok(ApiResponse::success_with_message(
            CreatedServiceResponse {
                detail: ServiceDetailResponse {
                    progress: checklist_progress(&checklist),
                    service,
                    checklist,
                },
                transaction,
            },
            "Serviço criado com sucesso",
        ))
    }

    /// Edita los datos del servicio. El estado se cambia por `update_status`
    /// y el cobro ya generado no se recalcula.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        request: ServiceRequest,
    ) -> Result<ApiResponse<ServiceDetailResponse>, AppError> {
        validate_request(&request)?;
        self.check_references(&request).await?;

        let mut service = self.find(id).await?;
        service.client_id = request.client_id;
        service.vehicle_id = request.vehicle_id;
        service.service_type = normalize_service_type(&request.service_type);
        service.price = request.price;
        apply_request(&mut service, request);
        service.updated_at = Utc::now();

        let service = self.store.upsert_service(&service).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ServiceUpdated,
                EntityType::Service,
                service.id,
                json!({ "service_type": service.service_type, "price": service.price.to_string() }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.detail(service).await?,
            "Serviço atualizado com sucesso",
        ))
    }

    pub async fn update_status(
        &self,
        actor: &Actor,
        id: Uuid,
        request: UpdateServiceStatusRequest,
    ) -> Result<ApiResponse<ServiceDetailResponse>, AppError> {
        let mut service = self.find(id).await?;
        let from = service.status;
        let to = request.status;

        if from == to {
            return Ok(ApiResponse::success(self.detail(service).await?));
        }
        if !from.can_transition_to(to) {
            return Err(AppError::BadRequest(format!(
                "Serviço {:?} não pode mudar para {:?}",
                from, to
            )));
        }

        service.status = to;
        service.updated_at = Utc::now();
        let service = self.store.upsert_service(&service).await?;
        info!("🔀 Servicio {}: {:?} → {:?}", service.id, from, to);

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ServiceStatusChanged,
                EntityType::Service,
                service.id,
                json!({ "from": from, "to": to }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            self.detail(service).await?,
            "Status atualizado",
        ))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let service = self.find(id).await?;
        if !self.store.delete_service(id).await? {
            return Err(not_found_error("Service", &id.to_string()));
        }

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ServiceDeleted,
                EntityType::Service,
                id,
                json!({ "service_type": service.service_type }),
            )
            .await?;

        Ok(ApiResponse::message("Serviço excluído com sucesso"))
    }

    pub async fn list_checklist(&self, service_id: Uuid) -> Result<Vec<ServiceChecklistItem>, AppError> {
        self.find(service_id).await?;
        self.store.list_checklist_items(service_id).await
    }

    /// Paso manual, al final del checklist
    pub async fn add_checklist_item(
        &self,
        actor: &Actor,
        service_id: Uuid,
        request: ChecklistItemRequest,
    ) -> Result<ApiResponse<ServiceChecklistItem>, AppError> {
        request.validate()?;
        self.find(service_id).await?;

        let items = self.store.list_checklist_items(service_id).await?;
        let position = items.iter().map(|item| item.position + 1).max().unwrap_or(0);
        let item = ServiceChecklistItem::new(service_id, request.description.trim().to_string(), position);
        let item = self.store.upsert_checklist_item(&item).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ChecklistItemAdded,
                EntityType::ChecklistItem,
                item.id,
                json!({ "service_id": service_id, "description": item.description }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(item, "Etapa adicionada"))
    }

    pub async fn toggle_checklist_item(
        &self,
        actor: &Actor,
        service_id: Uuid,
        item_id: Uuid,
        request: ToggleChecklistItemRequest,
    ) -> Result<ApiResponse<ServiceChecklistItem>, AppError> {
        let mut item = self.find_item(service_id, item_id).await?;
        item.completed = request.completed;
        item.updated_at = Utc::now();
        let item = self.store.upsert_checklist_item(&item).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ChecklistItemToggled,
                EntityType::ChecklistItem,
                item.id,
                json!({ "service_id": service_id, "completed": item.completed }),
            )
            .await?;

        Ok(ApiResponse::success(item))
    }

    pub async fn remove_checklist_item(
        &self,
        actor: &Actor,
        service_id: Uuid,
        item_id: Uuid,
    ) -> Result<ApiResponse<()>, AppError> {
        let item = self.find_item(service_id, item_id).await?;
        self.store.delete_checklist_item(item.id).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::ChecklistItemRemoved,
                EntityType::ChecklistItem,
                item.id,
                json!({ "service_id": service_id, "description": item.description }),
            )
            .await?;

        Ok(ApiResponse::message("Etapa removida"))
    }
}

fn validate_request(request: &ServiceRequest) -> Result<(), AppError> {
    request.validate()?;

    let mut errors = FieldErrors::new();
    errors.check("price", validate_non_negative(request.price));
    errors.check("price", validate_money_scale(request.price));
    errors.finish()
}

fn apply_request(service: &mut Service, request: ServiceRequest) {
    service.due_date = request.due_date;
    service.payer_id = request.payer_id;
    service.agent_name = clean_optional(request.agent_name);
    service.detran_schedule = clean_optional(request.detran_schedule);
    service.notes = clean_optional(request.notes);
}
