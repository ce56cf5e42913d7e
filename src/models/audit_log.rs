//! Modelo de AuditLog
//!
//! Registro append-only de cada mutación. Nunca se actualiza ni se borra.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// Acciones auditadas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    ClientCreated,
    ClientUpdated,
    ClientDeleted,
    VehicleCreated,
    VehicleUpdated,
    VehicleDeleted,
    VehicleTransferred,
    ServiceCreated,
    ServiceUpdated,
    ServiceStatusChanged,
    ServiceDeleted,
    ChecklistItemAdded,
    ChecklistItemToggled,
    ChecklistItemRemoved,
    TransactionCreated,
    TransactionUpdated,
    TransactionPaid,
    TransactionDeleted,
    UserInvited,
    UserRemoved,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ClientCreated => "CLIENT_CREATED",
            AuditAction::ClientUpdated => "CLIENT_UPDATED",
            AuditAction::ClientDeleted => "CLIENT_DELETED",
            AuditAction::VehicleCreated => "VEHICLE_CREATED",
            AuditAction::VehicleUpdated => "VEHICLE_UPDATED",
            AuditAction::VehicleDeleted => "VEHICLE_DELETED",
            AuditAction::VehicleTransferred => "VEHICLE_TRANSFERRED",
            AuditAction::ServiceCreated => "SERVICE_CREATED",
            AuditAction::ServiceUpdated => "SERVICE_UPDATED",
            AuditAction::ServiceStatusChanged => "SERVICE_STATUS_CHANGED",
            AuditAction::ServiceDeleted => "SERVICE_DELETED",
            AuditAction::ChecklistItemAdded => "CHECKLIST_ITEM_ADDED",
            AuditAction::ChecklistItemToggled => "CHECKLIST_ITEM_TOGGLED",
            AuditAction::ChecklistItemRemoved => "CHECKLIST_ITEM_REMOVED",
            AuditAction::TransactionCreated => "TRANSACTION_CREATED",
            AuditAction::TransactionUpdated => "TRANSACTION_UPDATED",
            AuditAction::TransactionPaid => "TRANSACTION_PAID",
            AuditAction::TransactionDeleted => "TRANSACTION_DELETED",
            AuditAction::UserInvited => "USER_INVITED",
            AuditAction::UserRemoved => "USER_REMOVED",
        }
    }
}

/// Tipos de entidad auditados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Client,
    Vehicle,
    Service,
    ChecklistItem,
    Transaction,
    User,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Client => "client",
            EntityType::Vehicle => "vehicle",
            EntityType::Service => "service",
            EntityType::ChecklistItem => "checklist_item",
            EntityType::Transaction => "transaction",
            EntityType::User => "user",
        }
    }
}

/// Entrada de auditoría - mapea a la tabla audit_logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub user_id: Uuid,
    pub details: Json<Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        action: AuditAction,
        entity_type: EntityType,
        entity_id: Uuid,
        user_id: Uuid,
        details: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.as_str().to_string(),
            entity_type: entity_type.as_str().to_string(),
            entity_id,
            user_id,
            details: Json(details),
            created_at: Utc::now(),
        }
    }
}
