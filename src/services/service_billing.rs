use chrono::NaiveDate;

use crate::models::{Service, Transaction, TransactionKind, Vehicle};

pub const SERVICE_REVENUE_CATEGORY: &str = "SERVICOS";

/// Cobro pendiente asociado a un servicio.
///
/// Va contra el pagador (o el cliente si no hay pagador) y vence junto con
/// el servicio.
pub fn service_transaction(service: &Service, vehicle: &Vehicle, today: NaiveDate) -> Transaction {
    let mut transaction = Transaction::new(
        TransactionKind::Revenue,
        format!("{} - {}", service.service_type, vehicle.plate),
        service.price,
        today,
    );
    transaction.category = Some(SERVICE_REVENUE_CATEGORY.to_string());
    transaction.client_id = Some(service.billed_client_id());
    transaction.service_id = Some(service.id);
    transaction.due_date = service.due_date;
    transaction
}

/// Como `service_transaction`, pero los servicios sin precio no generan cobro.
pub fn billing_transaction(service: &Service, vehicle: &Vehicle, today: NaiveDate) -> Option<Transaction> {
    if service.price.is_zero() || service.price.is_sign_negative() {
        return None;
    }
    Some(service_transaction(service, vehicle, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionStatus;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn test_billing_goes_to_payer() {
        let client = Uuid::new_v4();
        let payer = Uuid::new_v4();
        let vehicle = Vehicle::new(client, "ABC1D23".into());
        let mut service = Service::new(client, vehicle.id, "LICENCIAMENTO".into(), Decimal::new(18050, 2));
        service.payer_id = Some(payer);
        service.due_date = NaiveDate::from_ymd_opt(2024, 7, 1);

        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let tx = billing_transaction(&service, &vehicle, today).unwrap();

        assert_eq!(tx.kind, TransactionKind::Revenue);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.amount, Decimal::new(18050, 2));
        assert_eq!(tx.client_id, Some(payer));
        assert_eq!(tx.service_id, Some(service.id));
        assert_eq!(tx.due_date, service.due_date);
        assert_eq!(tx.description, "LICENCIAMENTO - ABC1D23");
    }

    #[test]
    fn test_free_service_has_no_billing() {
        let vehicle = Vehicle::new(Uuid::new_v4(), "ABC1234".into());
        let service = Service::new(vehicle.owner_id, vehicle.id, "VISTORIA".into(), Decimal::ZERO);
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert!(billing_transaction(&service, &vehicle, today).is_none());
    }
}
