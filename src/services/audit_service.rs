//! Registro de auditoría
//!
//! Se llama después de que la mutación ya fue confirmada. Si el registro
//! falla, la mutación queda aplicada sin rastro: se informa como
//! `AppError::PartialWorkflow` para que el operador lo vea.

use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use crate::models::{Actor, AuditAction, AuditLog, EntityType};
use crate::repositories::DataStore;
use crate::utils::errors::{AppError, AppResult};

pub struct AuditService<'a> {
    store: &'a dyn DataStore,
}

impl<'a> AuditService<'a> {
    pub fn new(store: &'a dyn DataStore) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        actor: &Actor,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: Uuid,
        details: Value,
    ) -> AppResult<()> {
        let entry = AuditLog::new(action, entity_type, entity_id, actor.user_id, details);

        self.store.append_audit_log(&entry).await.map_err(|e| {
            error!("❌ {} {} aplicado sin auditoría: {}", action.as_str(), entity_id, e);
            AppError::PartialWorkflow(format!(
                "{} aplicado para {} {}, pero no se pudo registrar la auditoría: {}",
                action.as_str(),
                entity_type.as_str(),
                entity_id,
                e
            ))
        })
    }
}
