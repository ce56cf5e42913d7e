use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Service, ServiceChecklistItem, ServiceStatus, Transaction};
use crate::services::service_progress::ChecklistProgress;

// Request para crear o editar un servicio
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceRequest {
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,
    pub due_date: Option<NaiveDate>,
    pub price: Decimal,
    pub payer_id: Option<Uuid>,
    #[validate(length(max = 255))]
    pub agent_name: Option<String>,
    #[validate(length(max = 255))]
    pub detran_schedule: Option<String>,
    pub notes: Option<String>,
}

// Request para mover el servicio en su ciclo de vida
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServiceStatusRequest {
    pub status: ServiceStatus,
}

// Request para agregar un paso manual al checklist
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChecklistItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub description: String,
}

// Request para marcar o desmarcar un paso
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleChecklistItemRequest {
    pub completed: bool,
}

// Filtros para búsqueda de servicios
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFilters {
    pub search: Option<String>,
    pub status: Option<ServiceStatus>,
    pub client_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ServiceFilters {
    pub fn matches(&self, service: &Service) -> bool {
        if self.status.map_or(false, |s| s != service.status) {
            return false;
        }
        if self.client_id.map_or(false, |id| id != service.client_id) {
            return false;
        }
        if self.vehicle_id.map_or(false, |id| id != service.vehicle_id) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                [
                    Some(service.service_type.as_str()),
                    service.agent_name.as_deref(),
                    service.notes.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle))
            }
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

// Response de listado: servicio + progreso del checklist
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    #[serde(flatten)]
    pub service: Service,
    pub progress: ChecklistProgress,
}

// Response de detalle con el checklist completo
#[derive(Debug, Serialize)]
pub struct ServiceDetailResponse {
    #[serde(flatten)]
    pub service: Service,
    pub progress: ChecklistProgress,
    pub checklist: Vec<ServiceChecklistItem>,
}

// Resultado de crear un servicio: el servicio, su checklist y el cobro generado
#[derive(Debug, Serialize)]
pub struct CreatedServiceResponse {
    #[serde(flatten)]
    pub detail: ServiceDetailResponse,
    pub transaction: Option<Transaction>,
}
