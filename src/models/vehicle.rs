//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Máximo de fotos por vehículo
pub const MAX_VEHICLE_IMAGES: usize = 4;

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub plate: String,
    pub chassis: Option<String>,
    pub renavam: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub manufacture_year: Option<i32>,
    pub model_year: Option<i32>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub licensing_expiration: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(owner_id: Uuid, plate: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            plate,
            chassis: None,
            renavam: None,
            brand: None,
            model: None,
            manufacture_year: None,
            model_year: None,
            color: None,
            fuel_type: None,
            category: None,
            images: Vec::new(),
            licensing_expiration: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_add_image(&self) -> bool {
        self.images.len() < MAX_VEHICLE_IMAGES
    }

    /// Descripción corta: "ABC1D23 - VW Gol"
    pub fn label(&self) -> String {
        let description: Vec<&str> = [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if description.is_empty() {
            self.plate.clone()
        } else {
            format!("{} - {}", self.plate, description.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let mut vehicle = Vehicle::new(Uuid::new_v4(), "ABC1D23".into());
        assert_eq!(vehicle.label(), "ABC1D23");
        vehicle.brand = Some("VW".into());
        vehicle.model = Some("Gol".into());
        assert_eq!(vehicle.label(), "ABC1D23 - VW Gol");
    }

    #[test]
    fn test_image_limit() {
        let mut vehicle = Vehicle::new(Uuid::new_v4(), "ABC1234".into());
        for i in 0..MAX_VEHICLE_IMAGES {
            assert!(vehicle.can_add_image());
            vehicle.images.push(format!("https://cdn/{}.jpg", i));
        }
        assert!(!vehicle.can_add_image());
    }
}
