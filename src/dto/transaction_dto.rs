use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Transaction, TransactionKind, TransactionStatus};

// Request para crear o editar un lanzamiento manual
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub status: Option<TransactionStatus>,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    pub amount: Decimal,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub client_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    /// Por defecto, hoy
    pub transaction_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

// Filtros para búsqueda de transacciones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilters {
    pub kind: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
    pub client_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TransactionFilters {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.kind.map_or(true, |k| k == tx.kind)
            && self.status.map_or(true, |s| s == tx.status)
            && self.client_id.map_or(true, |id| Some(id) == tx.client_id)
            && self.service_id.map_or(true, |id| Some(id) == tx.service_id)
            && self.from.map_or(true, |from| tx.transaction_date >= from)
            && self.to.map_or(true, |to| tx.transaction_date <= to)
    }
}
