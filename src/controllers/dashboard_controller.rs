use std::sync::Arc;

use chrono::NaiveDate;

use crate::dto::client_dto::ClientFilters;
use crate::dto::dashboard_dto::{DocStatusCounts, OverviewResponse, ServiceStatusCounts};
use crate::dto::service_dto::ServiceFilters;
use crate::dto::transaction_dto::TransactionFilters;
use crate::dto::vehicle_dto::VehicleFilters;
use crate::models::{DocStatus, ServiceStatus};
use crate::repositories::DataStore;
use crate::services::expiration_alerts::{collect_alerts, ExpirationAlert, ExpirationStatus};
use crate::services::financial_summary::{summarize, FinancialSummary};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Lecturas agregadas del panel. Todo se recalcula en cada consulta.
pub struct DashboardController {
    store: Arc<dyn DataStore>,
    today: NaiveDate,
    alert_window_days: i64,
    cashflow_months: usize,
}

impl DashboardController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            today: state.today(),
            alert_window_days: state.config.alert_window_days,
            cashflow_months: state.config.cashflow_months,
        }
    }

    pub async fn alerts(&self) -> Result<Vec<ExpirationAlert>, AppError> {
        let (client_filters, vehicle_filters) = (ClientFilters::default(), VehicleFilters::default());
        let (clients, vehicles) = futures::try_join!(
            self.store.list_clients(&client_filters),
            self.store.list_vehicles(&vehicle_filters),
        )?;
        Ok(collect_alerts(&clients, &vehicles, self.today, self.alert_window_days))
    }

    pub async fn financial(&self, months: Option<usize>) -> Result<FinancialSummary, AppError> {
        let months = months.unwrap_or(self.cashflow_months).clamp(1, 60);
        let transactions = self.store.list_transactions(&TransactionFilters::default()).await?;
        Ok(summarize(&transactions, self.today, months))
    }

    pub async fn overview(&self) -> Result<OverviewResponse, AppError> {
        let client_filters = ClientFilters::default();
        let vehicle_filters = VehicleFilters::default();
        let service_filters = ServiceFilters::default();
        let (clients, vehicles, services) = futures::try_join!(
            self.store.list_clients(&client_filters),
            self.store.list_vehicles(&vehicle_filters),
            self.store.list_services(&service_filters),
        )?;

        let mut clients_by_doc_status = DocStatusCounts::default();
        for client in &clients {
            match client.doc_status {
                DocStatus::Pending => clients_by_doc_status.pending += 1,
                DocStatus::InProgress => clients_by_doc_status.in_progress += 1,
                DocStatus::Completed => clients_by_doc_status.completed += 1,
            }
        }

        let mut services_by_status = ServiceStatusCounts::default();
        for service in &services {
            match service.status {
                ServiceStatus::Todo => services_by_status.todo += 1,
                ServiceStatus::InProgress => services_by_status.in_progress += 1,
                ServiceStatus::WaitingDocs => services_by_status.waiting_docs += 1,
                ServiceStatus::Completed => services_by_status.completed += 1,
                ServiceStatus::Canceled => services_by_status.canceled += 1,
            }
        }

        let alerts = collect_alerts(&clients, &vehicles, self.today, self.alert_window_days);
        let expired_alerts = alerts
            .iter()
            .filter(|a| a.status == ExpirationStatus::Expired)
            .count();

        Ok(OverviewResponse {
            total_clients: clients.len(),
            total_vehicles: vehicles.len(),
            clients_by_doc_status,
            services_by_status,
            expired_alerts,
            expiring_soon_alerts: alerts.len() - expired_alerts,
        })
    }
}
