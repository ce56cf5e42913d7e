//! Alertas de vencimiento
//!
//! Clasifica cualquier fecha de vencimiento (CNH del cliente,
//! licenciamiento del vehículo) respecto de "hoy", con granularidad de día.
//! No guarda estado: cada consulta recalcula todo desde la fecha actual.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Client, Vehicle};

/// Ventana por defecto para "vence pronto"
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Ventana máxima aceptada (diez años)
pub const MAX_WINDOW_DAYS: i64 = 3650;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpirationStatus {
    Ok,
    ExpiringSoon,
    Expired,
}

/// Clasifica una fecha opcional.
///
/// `date < today` → EXPIRED, `date <= today + window` → EXPIRING_SOON,
/// ausente o más lejos → OK. La ventana se acota a `0..=MAX_WINDOW_DAYS`.
pub fn classify(date: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> ExpirationStatus {
    let Some(date) = date else {
        return ExpirationStatus::Ok;
    };

    let window = Duration::days(window_days.clamp(0, MAX_WINDOW_DAYS));
    let limit = today.checked_add_signed(window).unwrap_or(NaiveDate::MAX);

    if date < today {
        ExpirationStatus::Expired
    } else if date <= limit {
        ExpirationStatus::ExpiringSoon
    } else {
        ExpirationStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSource {
    ClientLicense,
    VehicleLicensing,
}

/// Una alerta del pool mostrado en el dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpirationAlert {
    pub source: AlertSource,
    pub entity_id: Uuid,
    pub label: String,
    pub date: NaiveDate,
    pub status: ExpirationStatus,
    /// Días hasta el vencimiento (negativo si ya venció)
    pub days_remaining: i64,
}

/// Junta las alertas de clientes y vehículos, ordenadas por fecha ascendente.
/// Sin deduplicación ni supresión.
pub fn collect_alerts(
    clients: &[Client],
    vehicles: &[Vehicle],
    today: NaiveDate,
    window_days: i64,
) -> Vec<ExpirationAlert> {
    let client_alerts = clients.iter().filter_map(|client| {
        build_alert(
            AlertSource::ClientLicense,
            client.id,
            client.display_name(),
            client.license_expiration,
            today,
            window_days,
        )
    });

    let vehicle_alerts = vehicles.iter().filter_map(|vehicle| {
        build_alert(
            AlertSource::VehicleLicensing,
            vehicle.id,
            vehicle.label(),
            vehicle.licensing_expiration,
            today,
            window_days,
        )
    });

    let mut alerts: Vec<ExpirationAlert> = client_alerts.chain(vehicle_alerts).collect();
    // sort estable: a igual fecha, clientes antes que vehículos
    alerts.sort_by_key(|alert| alert.date);
    alerts
}

fn build_alert(
    source: AlertSource,
    entity_id: Uuid,
    label: String,
    date: Option<NaiveDate>,
    today: NaiveDate,
    window_days: i64,
) -> Option<ExpirationAlert> {
    let status = classify(date, today, window_days);
    if status == ExpirationStatus::Ok {
        return None;
    }
    let date = date?;
    Some(ExpirationAlert {
        source,
        entity_id,
        label,
        date,
        status,
        days_remaining: (date - today).num_days(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_absent_date_is_ok() {
        assert_eq!(classify(None, today(), DEFAULT_WINDOW_DAYS), ExpirationStatus::Ok);
    }

    #[test]
    fn test_window_boundaries() {
        let t = today();
        assert_eq!(
            classify(Some(t + Duration::days(30)), t, DEFAULT_WINDOW_DAYS),
            ExpirationStatus::ExpiringSoon
        );
        assert_eq!(
            classify(Some(t + Duration::days(31)), t, DEFAULT_WINDOW_DAYS),
            ExpirationStatus::Ok
        );
        assert_eq!(
            classify(Some(t - Duration::days(1)), t, DEFAULT_WINDOW_DAYS),
            ExpirationStatus::Expired
        );
        assert_eq!(classify(Some(t), t, DEFAULT_WINDOW_DAYS), ExpirationStatus::ExpiringSoon);
    }

    #[test]
    fn test_custom_window() {
        let t = today();
        assert_eq!(classify(Some(t + Duration::days(10)), t, 7), ExpirationStatus::Ok);
        assert_eq!(classify(Some(t + Duration::days(7)), t, 7), ExpirationStatus::ExpiringSoon);
    }

    #[test]
    fn test_out_of_range_window_is_clamped() {
        let t = today();
        let far = Some(t + Duration::days(MAX_WINDOW_DAYS + 1));
        assert_eq!(classify(far, t, 1_000_000_000_000), ExpirationStatus::Ok);
        assert_eq!(classify(Some(t), t, i64::MAX), ExpirationStatus::ExpiringSoon);
        assert_eq!(classify(Some(t), t, -5), ExpirationStatus::ExpiringSoon);
        assert_eq!(classify(Some(t + Duration::days(1)), t, -5), ExpirationStatus::Ok);
    }

    #[test]
    fn test_collect_alerts_pools_and_sorts() {
        let t = today();

        let mut soon = Client::new(ClientType::Individual);
        soon.name = Some("Ana".into());
        soon.license_expiration = Some(t + Duration::days(20));

        let mut fine = Client::new(ClientType::Individual);
        fine.license_expiration = Some(t + Duration::days(200));

        let no_date = Client::new(ClientType::Company);

        let mut expired = Vehicle::new(soon.id, "ABC1234".into());
        expired.licensing_expiration = Some(t - Duration::days(5));

        let mut also_soon = Vehicle::new(soon.id, "XYZ9A87".into());
        also_soon.licensing_expiration = Some(t + Duration::days(3));

        let alerts = collect_alerts(
            &[soon.clone(), fine, no_date],
            &[also_soon.clone(), expired.clone()],
            t,
            DEFAULT_WINDOW_DAYS,
        );

        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].entity_id, expired.id);
        assert_eq!(alerts[0].status, ExpirationStatus::Expired);
        assert_eq!(alerts[0].days_remaining, -5);
        assert_eq!(alerts[1].entity_id, also_soon.id);
        assert_eq!(alerts[2].entity_id, soon.id);
        assert_eq!(alerts[2].source, AlertSource::ClientLicense);
        assert_eq!(alerts[2].label, "Ana");
    }
}
