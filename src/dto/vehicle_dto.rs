use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Service, Transaction, Vehicle};
use crate::services::expiration_alerts::ExpirationStatus;
use crate::utils::validation::normalize_plate;

// Campos editables de un vehículo (el propietario sólo cambia por transferencia)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleFields {
    #[validate(length(min = 7, max = 8))]
    pub plate: String,
    pub chassis: Option<String>,
    pub renavam: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub manufacture_year: Option<i32>,
    #[validate(range(min = 1900, max = 2100))]
    pub model_year: Option<i32>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(length(max = 30))]
    pub fuel_type: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    pub licensing_expiration: Option<NaiveDate>,
    pub notes: Option<String>,
}

// Request para crear un vehículo
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicleRequest {
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub fields: VehicleFields,
}

// Request para transferir un vehículo a otro cliente
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransferVehicleRequest {
    pub seller_id: Uuid,
    pub new_owner_id: Uuid,
    pub price: Decimal,
    pub due_date: Option<NaiveDate>,
    /// Debe ser el vendedor o el comprador
    pub payer_id: Uuid,
    #[validate(length(max = 255))]
    pub agent_name: Option<String>,
    #[validate(length(max = 255))]
    pub detran_schedule: Option<String>,
    pub notes: Option<String>,
    pub service_type: Option<String>,
}

// Filtros para búsqueda de vehículos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilters {
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl VehicleFilters {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if self.owner_id.map_or(false, |owner| owner != vehicle.owner_id) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                let plate_needle = normalize_plate(term);
                (!plate_needle.is_empty() && vehicle.plate.contains(&plate_needle))
                    || [
                        vehicle.chassis.as_deref(),
                        vehicle.renavam.as_deref(),
                        vehicle.brand.as_deref(),
                        vehicle.model.as_deref(),
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

// Response de vehículo con la alerta de licenciamiento calculada en lectura
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub licensing_alert: ExpirationStatus,
}

// Resultado de una transferencia confirmada
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub vehicle: Vehicle,
    pub service: Service,
    pub transaction: Transaction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_by_partial_plate() {
        let mut vehicle = Vehicle::new(Uuid::new_v4(), "ABC1D23".into());
        vehicle.brand = Some("Fiat".into());
        let filters = VehicleFilters {
            search: Some("abc-1d".into()),
            ..Default::default()
        };
        assert!(filters.matches(&vehicle));

        let filters = VehicleFilters {
            search: Some("fiat".into()),
            ..Default::default()
        };
        assert!(filters.matches(&vehicle));

        let filters = VehicleFilters {
            search: Some("honda".into()),
            ..Default::default()
        };
        assert!(!filters.matches(&vehicle));
    }

    #[test]
    fn test_owner_filter() {
        let owner = Uuid::new_v4();
        let vehicle = Vehicle::new(owner, "ABC1234".into());
        let filters = VehicleFilters {
            owner_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!filters.matches(&vehicle));
        let filters = VehicleFilters {
            owner_id: Some(owner),
            ..Default::default()
        };
        assert!(filters.matches(&vehicle));
    }
}
