//! Contrato de acceso a datos
//!
//! Los controllers sólo hablan con `DataStore`. Hay dos implementaciones:
//! `PgStore` (PostgreSQL vía sqlx) y `MemoryStore` (tests y modo demo).

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::audit_dto::AuditLogFilters;
use crate::dto::client_dto::ClientFilters;
use crate::dto::service_dto::ServiceFilters;
use crate::dto::transaction_dto::TransactionFilters;
use crate::dto::vehicle_dto::VehicleFilters;
use crate::models::{
    AuditLog, Client, Service, ServiceChecklistItem, Transaction, Vehicle,
};
use crate::utils::errors::AppResult;

/// Alta de un servicio con su checklist y su cobro, confirmada como una unidad
#[derive(Debug, Clone)]
pub struct ServiceBundle {
    pub service: Service,
    pub checklist: Vec<ServiceChecklistItem>,
    pub transaction: Option<Transaction>,
    pub audit: AuditLog,
}

/// Efectos de una transferencia de vehículo, confirmados como una unidad.
///
/// Al confirmar, el vehículo debe seguir perteneciendo a `seller_id`;
/// si no, no se aplica nada y se devuelve `AppError::Conflict`.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub vehicle_id: Uuid,
    pub seller_id: Uuid,
    pub new_owner_id: Uuid,
    pub service: Service,
    pub checklist: Vec<ServiceChecklistItem>,
    pub transaction: Transaction,
    pub audit: AuditLog,
}

#[async_trait]
pub trait DataStore: Send + Sync {
    // Clients
    async fn list_clients(&self, filters: &ClientFilters) -> AppResult<Vec<Client>>;
    async fn find_client(&self, id: Uuid) -> AppResult<Option<Client>>;
    async fn upsert_client(&self, client: &Client) -> AppResult<Client>;
    /// Borra el cliente y sus dependientes; false si no existía
    async fn delete_client(&self, id: Uuid) -> AppResult<bool>;

    // Vehicles
    async fn list_vehicles(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>>;
    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn find_vehicle_by_plate(&self, plate: &str) -> AppResult<Option<Vehicle>>;
    /// En vehículos existentes conserva el dueño guardado
    async fn upsert_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn delete_vehicle(&self, id: Uuid) -> AppResult<bool>;

    // Services
    async fn list_services(&self, filters: &ServiceFilters) -> AppResult<Vec<Service>>;
    async fn find_service(&self, id: Uuid) -> AppResult<Option<Service>>;
    async fn upsert_service(&self, service: &Service) -> AppResult<Service>;
    async fn delete_service(&self, id: Uuid) -> AppResult<bool>;
    async fn commit_service(&self, bundle: &ServiceBundle) -> AppResult<()>;

    // Checklist
    async fn list_checklist_items(&self, service_id: Uuid) -> AppResult<Vec<ServiceChecklistItem>>;
    async fn find_checklist_item(&self, id: Uuid) -> AppResult<Option<ServiceChecklistItem>>;
    async fn upsert_checklist_item(&self, item: &ServiceChecklistItem) -> AppResult<ServiceChecklistItem>;
    async fn delete_checklist_item(&self, id: Uuid) -> AppResult<bool>;

    // Transactions
    async fn list_transactions(&self, filters: &TransactionFilters) -> AppResult<Vec<Transaction>>;
    async fn find_transaction(&self, id: Uuid) -> AppResult<Option<Transaction>>;
    async fn upsert_transaction(&self, transaction: &Transaction) -> AppResult<Transaction>;
    async fn delete_transaction(&self, id: Uuid) -> AppResult<bool>;

    // Audit (append-only)
    async fn append_audit_log(&self, entry: &AuditLog) -> AppResult<()>;
    async fn list_audit_logs(&self, filters: &AuditLogFilters) -> AppResult<Vec<AuditLog>>;

    // Workflows
    async fn commit_transfer(&self, plan: &TransferPlan) -> AppResult<()>;
}
