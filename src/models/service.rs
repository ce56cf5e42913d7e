//! Modelo de Service
//!
//! Un proceso del despachante sobre un vehículo de un cliente, con su
//! ciclo de vida `TODO → IN_PROGRESS → WAITING_DOCS → COMPLETED` y la
//! salida `CANCELED` desde cualquier estado no terminal.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del servicio - mapea al ENUM service_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "service_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Todo,
    InProgress,
    WaitingDocs,
    Completed,
    Canceled,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 5] = [
        ServiceStatus::Todo,
        ServiceStatus::InProgress,
        ServiceStatus::WaitingDocs,
        ServiceStatus::Completed,
        ServiceStatus::Canceled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceStatus::Completed | ServiceStatus::Canceled)
    }

    /// Los estados terminales son finales; entre no terminales se permite
    /// cualquier movimiento.
    pub fn can_transition_to(&self, next: ServiceStatus) -> bool {
        *self == next || !self.is_terminal()
    }
}

/// Service principal - mapea a la tabla services
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub status: ServiceStatus,
    pub due_date: Option<NaiveDate>,
    pub price: Decimal,
    pub payer_id: Option<Uuid>,
    pub agent_name: Option<String>,
    /// Agendamiento en el DETRAN (texto libre)
    pub detran_schedule: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn new(client_id: Uuid, vehicle_id: Uuid, service_type: String, price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            vehicle_id,
            service_type,
            status: ServiceStatus::Todo,
            due_date: None,
            price,
            payer_id: None,
            agent_name: None,
            detran_schedule: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Cliente responsable del pago: el pagador explícito o el propio cliente
    pub fn billed_client_id(&self) -> Uuid {
        self.payer_id.unwrap_or(self.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_are_final() {
        for next in ServiceStatus::ALL {
            if next != ServiceStatus::Completed {
                assert!(!ServiceStatus::Completed.can_transition_to(next));
            }
            if next != ServiceStatus::Canceled {
                assert!(!ServiceStatus::Canceled.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_non_terminal_can_cancel() {
        for from in [ServiceStatus::Todo, ServiceStatus::InProgress, ServiceStatus::WaitingDocs] {
            assert!(from.can_transition_to(ServiceStatus::Canceled));
            assert!(from.can_transition_to(ServiceStatus::Completed));
        }
        assert!(ServiceStatus::WaitingDocs.can_transition_to(ServiceStatus::InProgress));
    }

    #[test]
    fn test_billed_client() {
        let client = Uuid::new_v4();
        let payer = Uuid::new_v4();
        let mut service = Service::new(client, Uuid::new_v4(), "LICENCIAMENTO".into(), Decimal::ZERO);
        assert_eq!(service.billed_client_id(), client);
        service.payer_id = Some(payer);
        assert_eq!(service.billed_client_id(), payer);
    }
}
