use serde::{Deserialize, Serialize};

// Query del resumen financiero
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinancialQuery {
    /// Meses del flujo de caja (por defecto CASHFLOW_MONTHS)
    pub months: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DocStatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ServiceStatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub waiting_docs: usize,
    pub completed: usize,
    pub canceled: usize,
}

// Vista general del dashboard
#[derive(Debug, Clone, Serialize)]
pub struct OverviewResponse {
    pub total_clients: usize,
    pub total_vehicles: usize,
    pub clients_by_doc_status: DocStatusCounts,
    pub services_by_status: ServiceStatusCounts,
    pub expired_alerts: usize,
    pub expiring_soon_alerts: usize,
}
