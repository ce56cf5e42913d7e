use serde::Deserialize;
use uuid::Uuid;

use crate::models::AuditLog;

/// Límite por defecto de entradas devueltas
pub const DEFAULT_AUDIT_LIMIT: i64 = 100;

// Filtros para consultar el log de auditoría
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogFilters {
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub action: Option<String>,
    pub limit: Option<i64>,
}

impl AuditLogFilters {
    pub fn matches(&self, entry: &AuditLog) -> bool {
        self.entity_type.as_deref().map_or(true, |t| t == entry.entity_type)
            && self.entity_id.map_or(true, |id| id == entry.entity_id)
            && self.action.as_deref().map_or(true, |a| a == entry.action)
    }

    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, super::MAX_PAGE_SIZE)
    }
}
