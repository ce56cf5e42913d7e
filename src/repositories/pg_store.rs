//! Store PostgreSQL
//!
//! Compone los repositorios por entidad. Los flujos de varias filas
//! (alta de servicio, transferencia) se confirman en una única transacción.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::audit_dto::AuditLogFilters;
use crate::dto::client_dto::ClientFilters;
use crate::dto::service_dto::ServiceFilters;
use crate::dto::transaction_dto::TransactionFilters;
use crate::dto::vehicle_dto::VehicleFilters;
use crate::models::{
    AuditLog, Client, Service, ServiceChecklistItem, Transaction, Vehicle,
};
use crate::repositories::audit_repository::AuditRepository;
use crate::repositories::checklist_repository::ChecklistRepository;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::data_store::{DataStore, ServiceBundle, TransferPlan};
use crate::repositories::service_repository::ServiceRepository;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct PgStore {
    pool: PgPool,
    clients: ClientRepository,
    vehicles: VehicleRepository,
    services: ServiceRepository,
    checklist: ChecklistRepository,
    transactions: TransactionRepository,
    audit: AuditRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            services: ServiceRepository::new(pool.clone()),
            checklist: ChecklistRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool.clone()),
            audit: AuditRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn list_clients(&self, filters: &ClientFilters) -> AppResult<Vec<Client>> {
        self.clients.list(filters).await
    }

    async fn find_client(&self, id: Uuid) -> AppResult<Option<Client>> {
        self.clients.find_by_id(id).await
    }

    async fn upsert_client(&self, client: &Client) -> AppResult<Client> {
        self.clients.upsert(client).await
    }

    async fn delete_client(&self, id: Uuid) -> AppResult<bool> {
        self.clients.delete(id).await
    }

    async fn list_vehicles(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        self.vehicles.list(filters).await
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        self.vehicles.find_by_id(id).await
    }

    async fn find_vehicle_by_plate(&self, plate: &str) -> AppResult<Option<Vehicle>> {
        self.vehicles.find_by_plate(plate).await
    }

    async fn upsert_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.vehicles.upsert(vehicle).await
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<bool> {
        self.vehicles.delete(id).await
    }

    async fn list_services(&self, filters: &ServiceFilters) -> AppResult<Vec<Service>> {
        self.services.list(filters).await
    }

    async fn find_service(&self, id: Uuid) -> AppResult<Option<Service>> {
        self.services.find_by_id(id).await
    }

    async fn upsert_service(&self, service: &Service) -> AppResult<Service> {
        self.services.upsert(service).await
    }

    async fn delete_service(&self, id: Uuid) -> AppResult<bool> {
        self.services.delete(id).await
    }

    async fn commit_service(&self, bundle: &ServiceBundle) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        ServiceRepository::upsert_with(&mut *tx, &bundle.service).await?;
        for item in &bundle.checklist {
            ChecklistRepository::upsert_with(&mut *tx, item).await?;
        }
        if let Some(transaction) = &bundle.transaction {
            TransactionRepository::upsert_with(&mut *tx, transaction).await?;
        }
        AuditRepository::append_with(&mut *tx, &bundle.audit).await?;

        tx.commit().await?;
        log::info!(
            "✅ Servicio {} confirmado con {} tareas",
            bundle.service.id,
            bundle.checklist.len()
        );
        Ok(())
    }

    async fn list_checklist_items(&self, service_id: Uuid) -> AppResult<Vec<ServiceChecklistItem>> {
        self.checklist.list_for_service(service_id).await
    }

    async fn find_checklist_item(&self, id: Uuid) -> AppResult<Option<ServiceChecklistItem>> {
        self.checklist.find_by_id(id).await
    }

    async fn upsert_checklist_item(&self, item: &ServiceChecklistItem) -> AppResult<ServiceChecklistItem> {
        self.checklist.upsert(item).await
    }

    async fn delete_checklist_item(&self, id: Uuid) -> AppResult<bool> {
        self.checklist.delete(id).await
    }

    async fn list_transactions(&self, filters: &TransactionFilters) -> AppResult<Vec<Transaction>> {
        self.transactions.list(filters).await
    }

    async fn find_transaction(&self, id: Uuid) -> AppResult<Option<Transaction>> {
        self.transactions.find_by_id(id).await
    }

    async fn upsert_transaction(&self, transaction: &Transaction) -> AppResult<Transaction> {
        self.transactions.upsert(transaction).await
    }

    async fn delete_transaction(&self, id: Uuid) -> AppResult<bool> {
        self.transactions.delete(id).await
    }

    async fn append_audit_log(&self, entry: &AuditLog) -> AppResult<()> {
        self.audit.append(entry).await
    }

    async fn list_audit_logs(&self, filters: &AuditLogFilters) -> AppResult<Vec<AuditLog>> {
        self.audit.list(filters).await
    }

    async fn commit_transfer(&self, plan: &TransferPlan) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let moved = VehicleRepository::transfer_owner_with(
            &mut *tx,
            plan.vehicle_id,
            plan.seller_id,
            plan.new_owner_id,
        )
        .await?;

        if !moved {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
                .bind(plan.vehicle_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.rollback().await?;

            log::warn!("⚠️ Transferencia rechazada para vehículo {}", plan.vehicle_id);
            return Err(if exists {
                AppError::Conflict("O veículo não pertence mais ao vendedor informado".to_string())
            } else {
                not_found_error("Vehicle", &plan.vehicle_id.to_string())
            });
        }

        ServiceRepository::upsert_with(&mut *tx, &plan.service).await?;
        for item in &plan.checklist {
            ChecklistRepository::upsert_with(&mut *tx, item).await?;
        }
        TransactionRepository::upsert_with(&mut *tx, &plan.transaction).await?;
        AuditRepository::append_with(&mut *tx, &plan.audit).await?;

        tx.commit().await?;
        log::info!(
            "✅ Vehículo {} transferido de {} a {}",
            plan.vehicle_id,
            plan.seller_id,
            plan.new_owner_id
        );
        Ok(())
    }
}
