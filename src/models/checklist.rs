use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Paso del checklist de un servicio - mapea a la tabla service_checklist_items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ServiceChecklistItem {
    pub id: Uuid,
    pub service_id: Uuid,
    pub description: String,
    pub completed: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceChecklistItem {
    pub fn new(service_id: Uuid, description: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            service_id,
            description,
            completed: false,
            position,
            created_at: now,
            updated_at: now,
        }
    }
}
