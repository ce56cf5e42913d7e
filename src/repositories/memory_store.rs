//! Store en memoria
//!
//! Implementa `DataStore` sobre tablas indexadas por id, con las mismas reglas
//! que el schema PostgreSQL: placa única, borrado en cascada y
//! confirmación atómica de transferencias (un solo write lock).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::audit_dto::AuditLogFilters;
use crate::dto::client_dto::ClientFilters;
use crate::dto::service_dto::ServiceFilters;
use crate::dto::transaction_dto::TransactionFilters;
use crate::dto::vehicle_dto::VehicleFilters;
use crate::dto::{page_limit, page_offset};
use crate::models::{
    AuditLog, Client, Service, ServiceChecklistItem, Transaction, Vehicle,
};
use crate::repositories::data_store::{DataStore, ServiceBundle, TransferPlan};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

#[derive(Default)]
struct Tables {
    clients: HashMap<Uuid, Client>,
    vehicles: HashMap<Uuid, Vehicle>,
    services: HashMap<Uuid, Service>,
    checklist_items: HashMap<Uuid, ServiceChecklistItem>,
    transactions: HashMap<Uuid, Transaction>,
    audit_logs: Vec<AuditLog>,
}

impl Tables {
    fn ensure_unique_plate(&self, vehicle: &Vehicle) -> AppResult<()> {
        let taken = self
            .vehicles
            .values()
            .any(|other| other.id != vehicle.id && other.plate == vehicle.plate);
        if taken {
            return Err(conflict_error("Vehicle", "plate", &vehicle.plate));
        }
        Ok(())
    }

    /// Borra servicios con sus checklists y desvincula las transacciones
    fn remove_services(&mut self, service_ids: &[Uuid]) {
        if service_ids.is_empty() {
            return;
        }
        self.services.retain(|id, _| !service_ids.contains(id));
        self.checklist_items
            .retain(|_, item| !service_ids.contains(&item.service_id));
        for tx in self.transactions.values_mut() {
            if tx.service_id.map_or(false, |id| service_ids.contains(&id)) {
                tx.service_id = None;
            }
        }
    }

    fn remove_vehicles(&mut self, vehicle_ids: &[Uuid]) {
        let service_ids: Vec<Uuid> = self
            .services
            .values()
            .filter(|service| vehicle_ids.contains(&service.vehicle_id))
            .map(|service| service.id)
            .collect();
        self.remove_services(&service_ids);
        self.vehicles.retain(|id, _| !vehicle_ids.contains(id));
    }
}

/// Ordena por fecha de creación descendente y aplica offset/limit
fn paginate<T>(
    mut rows: Vec<T>,
    created_at: impl Fn(&T) -> chrono::DateTime<Utc>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Vec<T> {
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    let offset = page_offset(offset) as usize;
    let limit = page_limit(limit).map_or(usize::MAX, |l| l as usize);
    rows.into_iter().skip(offset).take(limit).collect()
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn list_clients(&self, filters: &ClientFilters) -> AppResult<Vec<Client>> {
        let tables = self.tables.read().await;
        let rows: Vec<Client> = tables
            .clients
            .values()
            .filter(|client| filters.matches(client))
            .cloned()
            .collect();
        Ok(paginate(rows, |c| c.created_at, filters.limit, filters.offset))
    }

    async fn find_client(&self, id: Uuid) -> AppResult<Option<Client>> {
        Ok(self.tables.read().await.clients.get(&id).cloned())
    }

    async fn upsert_client(&self, client: &Client) -> AppResult<Client> {
        let mut tables = self.tables.write().await;
        tables.clients.insert(client.id, client.clone());
        Ok(client.clone())
    }

    async fn delete_client(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.clients.remove(&id).is_none() {
            return Ok(false);
        }

        let vehicle_ids: Vec<Uuid> = tables
            .vehicles
            .values()
            .filter(|vehicle| vehicle.owner_id == id)
            .map(|vehicle| vehicle.id)
            .collect();
        tables.remove_vehicles(&vehicle_ids);

        let service_ids: Vec<Uuid> = tables
            .services
            .values()
            .filter(|service| service.client_id == id)
            .map(|service| service.id)
            .collect();
        tables.remove_services(&service_ids);

        for service in tables.services.values_mut() {
            if service.payer_id == Some(id) {
                service.payer_id = None;
            }
        }
        for tx in tables.transactions.values_mut() {
            if tx.client_id == Some(id) {
                tx.client_id = None;
            }
        }
        Ok(true)
    }

    async fn list_vehicles(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        let rows: Vec<Vehicle> = tables
            .vehicles
            .values()
            .filter(|vehicle| filters.matches(vehicle))
            .cloned()
            .collect();
        Ok(paginate(rows, |v| v.created_at, filters.limit, filters.offset))
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }

    async fn find_vehicle_by_plate(&self, plate: &str) -> AppResult<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables.vehicles.values().find(|v| v.plate == plate).cloned())
    }

    async fn upsert_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        let mut saved = vehicle.clone();
        if let Some(existing) = tables.vehicles.get(&vehicle.id) {
            // el dueño sólo cambia por transferencia
            saved.owner_id = existing.owner_id;
        } else if !tables.clients.contains_key(&vehicle.owner_id) {
            return Err(not_found_error("Client", &vehicle.owner_id.to_string()));
        }
        tables.ensure_unique_plate(&saved)?;
        tables.vehicles.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&id) {
            return Ok(false);
        }
        tables.remove_vehicles(&[id]);
        Ok(true)
    }

    async fn list_services(&self, filters: &ServiceFilters) -> AppResult<Vec<Service>> {
        let tables = self.tables.read().await;
        let rows: Vec<Service> = tables
            .services
            .values()
            .filter(|service| filters.matches(service))
            .cloned()
            .collect();
        Ok(paginate(rows, |s| s.created_at, filters.limit, filters.offset))
    }

    async fn find_service(&self, id: Uuid) -> AppResult<Option<Service>> {
        Ok(self.tables.read().await.services.get(&id).cloned())
    }

    async fn upsert_service(&self, service: &Service) -> AppResult<Service> {
        let mut tables = self.tables.write().await;
        tables.services.insert(service.id, service.clone());
        Ok(service.clone())
    }

    async fn delete_service(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.services.contains_key(&id) {
            return Ok(false);
        }
        tables.remove_services(&[id]);
        Ok(true)
    }

    async fn commit_service(&self, bundle: &ServiceBundle) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.services.insert(bundle.service.id, bundle.service.clone());
        for item in &bundle.checklist {
            tables.checklist_items.insert(item.id, item.clone());
        }
        if let Some(tx) = &bundle.transaction {
            tables.transactions.insert(tx.id, tx.clone());
        }
        tables.audit_logs.push(bundle.audit.clone());
        Ok(())
    }

    async fn list_checklist_items(&self, service_id: Uuid) -> AppResult<Vec<ServiceChecklistItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<ServiceChecklistItem> = tables
            .checklist_items
            .values()
            .filter(|item| item.service_id == service_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.position, item.created_at));
        Ok(items)
    }

    async fn find_checklist_item(&self, id: Uuid) -> AppResult<Option<ServiceChecklistItem>> {
        Ok(self.tables.read().await.checklist_items.get(&id).cloned())
    }

    async fn upsert_checklist_item(&self, item: &ServiceChecklistItem) -> AppResult<ServiceChecklistItem> {
        let mut tables = self.tables.write().await;
        if !tables.services.contains_key(&item.service_id) {
            return Err(not_found_error("Service", &item.service_id.to_string()));
        }
        tables.checklist_items.insert(item.id, item.clone());
        Ok(item.clone())
    }

    async fn delete_checklist_item(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.checklist_items.remove(&id).is_some())
    }

    async fn list_transactions(&self, filters: &TransactionFilters) -> AppResult<Vec<Transaction>> {
        let tables = self.tables.read().await;
        let rows: Vec<Transaction> = tables
            .transactions
            .values()
            .filter(|tx| filters.matches(tx))
            .cloned()
            .collect();
        Ok(paginate(rows, |t| t.created_at, filters.limit, filters.offset))
    }

    async fn find_transaction(&self, id: Uuid) -> AppResult<Option<Transaction>> {
        Ok(self.tables.read().await.transactions.get(&id).cloned())
    }

    async fn upsert_transaction(&self, transaction: &Transaction) -> AppResult<Transaction> {
        let mut tables = self.tables.write().await;
        tables.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction.clone())
    }

    async fn delete_transaction(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.transactions.remove(&id).is_some())
    }

    async fn append_audit_log(&self, entry: &AuditLog) -> AppResult<()> {
        self.tables.write().await.audit_logs.push(entry.clone());
        Ok(())
    }

    async fn list_audit_logs(&self, filters: &AuditLogFilters) -> AppResult<Vec<AuditLog>> {
        let tables = self.tables.read().await;
        Ok(tables
            .audit_logs
            .iter()
            .rev()
            .filter(|entry| filters.matches(entry))
            .take(filters.effective_limit() as usize)
            .cloned()
            .collect())
    }

    async fn commit_transfer(&self, plan: &TransferPlan) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        let vehicle = tables
            .vehicles
            .get_mut(&plan.vehicle_id)
            .ok_or_else(|| not_found_error("Vehicle", &plan.vehicle_id.to_string()))?;
        if vehicle.owner_id != plan.seller_id {
            return Err(AppError::Conflict(
                "O veículo não pertence mais ao vendedor informado".to_string(),
            ));
        }
        vehicle.owner_id = plan.new_owner_id;
        vehicle.updated_at = Utc::now();

        tables.services.insert(plan.service.id, plan.service.clone());
        for item in &plan.checklist {
            tables.checklist_items.insert(item.id, item.clone());
        }
        tables.transactions.insert(plan.transaction.id, plan.transaction.clone());
        tables.audit_logs.push(plan.audit.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditAction, ClientType, EntityType, TransactionKind};
    use rust_decimal::Decimal;

    async fn seed(store: &MemoryStore) -> (Client, Vehicle, Service, Transaction) {
        let client = store.upsert_client(&Client::new(ClientType::Individual)).await.unwrap();
        let vehicle = store
            .upsert_vehicle(&Vehicle::new(client.id, "ABC1234".into()))
            .await
            .unwrap();
        let service = Service::new(client.id, vehicle.id, "LICENCIAMENTO".into(), Decimal::new(150, 0));
        let mut tx = Transaction::new(
            TransactionKind::Revenue,
            "Licenciamento".into(),
            Decimal::new(150, 0),
            Utc::now().date_naive(),
        );
        tx.client_id = Some(client.id);
        tx.service_id = Some(service.id);
        let bundle = ServiceBundle {
            service: service.clone(),
            checklist: vec![ServiceChecklistItem::new(service.id, "Passo".into(), 0)],
            transaction: Some(tx.clone()),
            audit: AuditLog::new(
                AuditAction::ServiceCreated,
                EntityType::Service,
                service.id,
                Uuid::new_v4(),
                serde_json::json!({}),
            ),
        };
        store.commit_service(&bundle).await.unwrap();
        (client, vehicle, service, tx)
    }

    #[tokio::test]
    async fn test_duplicate_plate_conflicts() {
        let store = MemoryStore::new();
        let (client, _, _, _) = seed(&store).await;
        let result = store
            .upsert_vehicle(&Vehicle::new(client.id, "ABC1234".into()))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_vehicle_requires_existing_owner() {
        let store = MemoryStore::new();
        let result = store
            .upsert_vehicle(&Vehicle::new(Uuid::new_v4(), "ABC1234".into()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stale_vehicle_edit_keeps_transferred_owner() {
        let store = MemoryStore::new();
        let (seller, vehicle, _, _) = seed(&store).await;
        let buyer = store.upsert_client(&Client::new(ClientType::Individual)).await.unwrap();

        let stale = store.find_vehicle(vehicle.id).await.unwrap().unwrap();

        let service = Service::new(seller.id, vehicle.id, "TRANSFERENCIA".into(), Decimal::new(200, 0));
        let plan = TransferPlan {
            vehicle_id: vehicle.id,
            seller_id: seller.id,
            new_owner_id: buyer.id,
            checklist: Vec::new(),
            transaction: Transaction::new(
                TransactionKind::Revenue,
                "Transferência".into(),
                Decimal::new(200, 0),
                Utc::now().date_naive(),
            ),
            audit: AuditLog::new(
                AuditAction::VehicleTransferred,
                EntityType::Vehicle,
                vehicle.id,
                Uuid::new_v4(),
                serde_json::json!({}),
            ),
            service,
        };
        store.commit_transfer(&plan).await.unwrap();

        let mut edited = stale;
        edited.color = Some("PRATA".into());
        let saved = store.upsert_vehicle(&edited).await.unwrap();

        assert_eq!(saved.owner_id, buyer.id);
        let stored = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
        assert_eq!(stored.owner_id, buyer.id);
        assert_eq!(stored.color.as_deref(), Some("PRATA"));
    }

    #[tokio::test]
    async fn test_delete_client_cascades() {
        let store = MemoryStore::new();
        let (client, vehicle, service, tx) = seed(&store).await;

        assert!(store.delete_client(client.id).await.unwrap());
        assert!(store.find_vehicle(vehicle.id).await.unwrap().is_none());
        assert!(store.find_service(service.id).await.unwrap().is_none());
        assert!(store.list_checklist_items(service.id).await.unwrap().is_empty());

        // el asiento se conserva, sin vínculos
        let kept = store.find_transaction(tx.id).await.unwrap().unwrap();
        assert_eq!(kept.client_id, None);
        assert_eq!(kept.service_id, None);

        assert!(!store.delete_client(client.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_audit_log_newest_first_with_limit() {
        let store = MemoryStore::new();
        let actor = Uuid::new_v4();
        for _ in 0..3 {
            store
                .append_audit_log(&AuditLog::new(
                    AuditAction::ClientCreated,
                    EntityType::Client,
                    Uuid::new_v4(),
                    actor,
                    serde_json::json!({}),
                ))
                .await
                .unwrap();
        }
        let last = AuditLog::new(
            AuditAction::ClientDeleted,
            EntityType::Client,
            Uuid::new_v4(),
            actor,
            serde_json::json!({}),
        );
        store.append_audit_log(&last).await.unwrap();

        let filters = AuditLogFilters {
            limit: Some(2),
            ..Default::default()
        };
        let entries = store.list_audit_logs(&filters).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, last.id);
    }
}
