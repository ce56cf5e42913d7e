//! Transferencia de vehículos
//!
//! Arma el `TransferPlan` (servicio + checklist + cobro + cambio de dueño +
//! auditoría) sin tocar el store. La confirmación atómica es del store.

use chrono::NaiveDate;
use serde_json::json;
use validator::ValidationError;

use crate::dto::vehicle_dto::TransferVehicleRequest;
use crate::models::{Actor, AuditAction, AuditLog, Client, EntityType, Service, Vehicle};
use crate::repositories::TransferPlan;
use crate::services::checklist_templates::{self, TRANSFER_SERVICE_TYPE};
use crate::services::service_billing::service_transaction;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{clean_optional, validate_money_scale, validate_positive, FieldErrors};

fn rule(code: &'static str) -> Result<(), ValidationError> {
    Err(ValidationError::new(code))
}

pub fn plan_transfer(
    vehicle: &Vehicle,
    seller: &Client,
    new_owner: &Client,
    request: &TransferVehicleRequest,
    actor: &Actor,
    today: NaiveDate,
) -> AppResult<TransferPlan> {
    let mut errors = FieldErrors::new();
    errors.check("price", validate_positive(request.price));
    errors.check("price", validate_money_scale(request.price));
    if seller.id == new_owner.id {
        errors.check("new_owner_id", rule("same_as_seller"));
    }
    if request.payer_id != seller.id && request.payer_id != new_owner.id {
        errors.check("payer_id", rule("payer_must_be_party"));
    }
    errors.finish()?;

    if vehicle.owner_id != seller.id {
        return Err(AppError::Conflict(format!(
            "O vendedor informado não é o proprietário atual do veículo {}",
            vehicle.plate
        )));
    }

    let service_type = request
        .service_type
        .as_deref()
        .map(checklist_templates::normalize_service_type)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| TRANSFER_SERVICE_TYPE.to_string());

    let mut service = Service::new(seller.id, vehicle.id, service_type, request.price);
    service.payer_id = Some(request.payer_id);
    service.due_date = request.due_date;
    service.agent_name = clean_optional(request.agent_name.clone());
    service.detran_schedule = clean_optional(request.detran_schedule.clone());
    service.notes = clean_optional(request.notes.clone());

    let checklist = checklist_templates::instantiate(service.id, &service.service_type);
    let transaction = service_transaction(&service, vehicle, today);

    let audit = AuditLog::new(
        AuditAction::VehicleTransferred,
        EntityType::Vehicle,
        vehicle.id,
        actor.user_id,
        json!({
            "plate": vehicle.plate,
            "seller_id": seller.id,
            "seller_name": seller.display_name(),
            "new_owner_id": new_owner.id,
            "new_owner_name": new_owner.display_name(),
            "payer_id": request.payer_id,
            "price": request.price.to_string(),
            "service_id": service.id,
            "transaction_id": transaction.id,
        }),
    );

    Ok(TransferPlan {
        vehicle_id: vehicle.id,
        seller_id: seller.id,
        new_owner_id: new_owner.id,
        service,
        checklist,
        transaction,
        audit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientType, ServiceStatus, TransactionKind, TransactionStatus};
    use crate::repositories::{DataStore, MemoryStore};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn request(seller: &Client, buyer: &Client, price: i64) -> TransferVehicleRequest {
        TransferVehicleRequest {
            seller_id: seller.id,
            new_owner_id: buyer.id,
            price: Decimal::new(price, 0),
            due_date: None,
            payer_id: buyer.id,
            agent_name: Some("  Carlos ".into()),
            detran_schedule: None,
            notes: None,
            service_type: None,
        }
    }

    fn named(name: &str) -> Client {
        let mut client = Client::new(ClientType::Individual);
        client.name = Some(name.into());
        client
    }

    #[test]
    fn test_plan_contents() {
        let (seller, buyer) = (named("Ana"), named("Bruno"));
        let vehicle = Vehicle::new(seller.id, "ABC1D23".into());
        let actor = Actor::new(Uuid::new_v4());

        let plan = plan_transfer(&vehicle, &seller, &buyer, &request(&seller, &buyer, 200), &actor, today()).unwrap();

        assert_eq!(plan.new_owner_id, buyer.id);
        assert_eq!(plan.service.client_id, seller.id);
        assert_eq!(plan.service.status, ServiceStatus::Todo);
        assert_eq!(plan.service.service_type, TRANSFER_SERVICE_TYPE);
        assert_eq!(plan.service.agent_name.as_deref(), Some("Carlos"));
        assert_eq!(plan.checklist.len(), 6);

        let tx = &plan.transaction;
        assert_eq!(tx.kind, TransactionKind::Revenue);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.amount, Decimal::new(200, 0));
        assert_eq!(tx.client_id, Some(buyer.id));
        assert_eq!(tx.service_id, Some(plan.service.id));

        assert_eq!(plan.audit.action, "VEHICLE_TRANSFERRED");
        assert_eq!(plan.audit.entity_id, vehicle.id);
        assert_eq!(plan.audit.user_id, actor.user_id);
    }

    #[test]
    fn test_rejects_invalid_parties_and_price() {
        let (seller, buyer) = (named("Ana"), named("Bruno"));
        let vehicle = Vehicle::new(seller.id, "ABC1D23".into());
        let actor = Actor::new(Uuid::new_v4());

        let same = plan_transfer(&vehicle, &seller, &seller, &request(&seller, &seller, 10), &actor, today());
        assert!(matches!(same, Err(AppError::Validation(_))));

        let mut outsider_pays = request(&seller, &buyer, 10);
        outsider_pays.payer_id = Uuid::new_v4();
        let result = plan_transfer(&vehicle, &seller, &buyer, &outsider_pays, &actor, today());
        assert!(matches!(result, Err(AppError::Validation(_))));

        let negative = plan_transfer(&vehicle, &seller, &buyer, &request(&seller, &buyer, -1), &actor, today());
        assert!(matches!(negative, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_seller_must_own_vehicle() {
        let (seller, buyer) = (named("Ana"), named("Bruno"));
        let vehicle = Vehicle::new(buyer.id, "ABC1D23".into());
        let actor = Actor::new(Uuid::new_v4());

        let result = plan_transfer(&vehicle, &seller, &buyer, &request(&seller, &buyer, 200), &actor, today());
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_transfer_price_must_be_positive() {
        let (seller, buyer) = (named("Ana"), named("Bruno"));
        let vehicle = Vehicle::new(seller.id, "ABC1D23".into());
        let actor = Actor::new(Uuid::new_v4());

        let free = plan_transfer(&vehicle, &seller, &buyer, &request(&seller, &buyer, 0), &actor, today());
        assert!(matches!(free, Err(AppError::Validation(_))));

        let mut fractional = request(&seller, &buyer, 0);
        fractional.price = Decimal::new(1, 3);
        let result = plan_transfer(&vehicle, &seller, &buyer, &fractional, &actor, today());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_owner_without_side_effects() {
        let store = MemoryStore::new();
        let seller = store.upsert_client(&named("Ana")).await.unwrap();
        let buyer = store.upsert_client(&named("Bruno")).await.unwrap();
        let third = store.upsert_client(&named("Carla")).await.unwrap();
        let vehicle = store
            .upsert_vehicle(&Vehicle::new(seller.id, "ABC1D23".into()))
            .await
            .unwrap();
        let actor = Actor::new(Uuid::new_v4());

        let plan = plan_transfer(&vehicle, &seller, &buyer, &request(&seller, &buyer, 200), &actor, today()).unwrap();

        // otra sesión vende el vehículo antes de confirmar
        let other = plan_transfer(&vehicle, &seller, &third, &request(&seller, &third, 150), &actor, today()).unwrap();
        store.commit_transfer(&other).await.unwrap();

        let result = store.commit_transfer(&plan).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(store.find_service(plan.service.id).await.unwrap().is_none());
        assert_eq!(store.find_vehicle(vehicle.id).await.unwrap().unwrap().owner_id, third.id);
    }
}
