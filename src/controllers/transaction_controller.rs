use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::transaction_dto::{TransactionFilters, TransactionRequest};
use crate::dto::ApiResponse;
use crate::models::{Actor, AuditAction, EntityType, Transaction, TransactionStatus};
use crate::repositories::DataStore;
use crate::services::AuditService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{clean_optional, validate_money_scale, validate_positive, FieldErrors};

pub struct TransactionController {
    store: Arc<dyn DataStore>,
    today: NaiveDate,
}

impl TransactionController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            today: state.today(),
        }
    }

    async fn find(&self, id: Uuid) -> Result<Transaction, AppError> {
        self.store
            .find_transaction(id)
            .await?
            .ok_or_else(|| not_found_error("Transaction", &id.to_string()))
    }

    async fn check_links(&self, request: &TransactionRequest) -> Result<(), AppError> {
        if let Some(client_id) = request.client_id {
            if self.store.find_client(client_id).await?.is_none() {
                return Err(not_found_error("Client", &client_id.to_string()));
            }
        }
        if let Some(service_id) = request.service_id {
            if self.store.find_service(service_id).await?.is_none() {
                return Err(not_found_error("Service", &service_id.to_string()));
            }
        }
        Ok(())
    }

    pub async fn list(&self, filters: TransactionFilters) -> Result<Vec<Transaction>, AppError> {
        self.store.list_transactions(&filters).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Transaction, AppError> {
        self.find(id).await
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: TransactionRequest,
    ) -> Result<ApiResponse<Transaction>, AppError> {
        validate_request(&request)?;
        self.check_links(&request).await?;

        let mut transaction = Transaction::new(
            request.kind,
            request.description.trim().to_string(),
            request.amount,
            request.transaction_date.unwrap_or(self.today),
        );
        apply_request(&mut transaction, request);

        let transaction = self.store.upsert_transaction(&transaction).await?;
        info!(
            "💰 Lançamento {:?} de {} criado ({:?})",
            transaction.kind, transaction.amount, transaction.status
        );

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::TransactionCreated,
                EntityType::Transaction,
                transaction.id,
                json!({
                    "kind": transaction.kind,
                    "status": transaction.status,
                    "amount": transaction.amount.to_string(),
                }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(transaction, "Lançamento criado com sucesso"))
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        request: TransactionRequest,
    ) -> Result<ApiResponse<Transaction>, AppError> {
        validate_request(&request)?;
        self.check_links(&request).await?;

        let mut transaction = self.find(id).await?;
        transaction.kind = request.kind;
        transaction.description = request.description.trim().to_string();
        transaction.amount = request.amount;
        if let Some(date) = request.transaction_date {
            transaction.transaction_date = date;
        }
        apply_request(&mut transaction, request);
        transaction.updated_at = Utc::now();

        let transaction = self.store.upsert_transaction(&transaction).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::TransactionUpdated,
                EntityType::Transaction,
                transaction.id,
                json!({ "status": transaction.status, "amount": transaction.amount.to_string() }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(transaction, "Lançamento atualizado com sucesso"))
    }

    /// Marca como pagada. Repetirlo no cambia nada.
    pub async fn mark_paid(&self, actor: &Actor, id: Uuid) -> Result<ApiResponse<Transaction>, AppError> {
        let mut transaction = self.find(id).await?;
        if transaction.status == TransactionStatus::Paid {
            return Ok(ApiResponse::success_with_message(transaction, "Lançamento já estava pago"));
        }

        set_status(&mut transaction, TransactionStatus::Paid);
        transaction.updated_at = Utc::now();
        let transaction = self.store.upsert_transaction(&transaction).await?;
        info!("✅ Lançamento {} pago", transaction.id);

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::TransactionPaid,
                EntityType::Transaction,
                transaction.id,
                json!({ "amount": transaction.amount.to_string(), "kind": transaction.kind }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(transaction, "Pagamento registrado"))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let transaction = self.find(id).await?;
        if !self.store.delete_transaction(id).await? {
            return Err(not_found_error("Transaction", &id.to_string()));
        }

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::TransactionDeleted,
                EntityType::Transaction,
                id,
                json!({ "description": transaction.description, "amount": transaction.amount.to_string() }),
            )
            .await?;

        Ok(ApiResponse::message("Lançamento excluído com sucesso"))
    }
}

fn validate_request(request: &TransactionRequest) -> Result<(), AppError> {
    request.validate()?;

    let mut errors = FieldErrors::new();
    errors.check("amount", validate_positive(request.amount));
    errors.check("amount", validate_money_scale(request.amount));
    errors.finish()
}

/// `paid_at` acompaña al estado
fn set_status(transaction: &mut Transaction, status: TransactionStatus) {
    match (transaction.status, status) {
        (TransactionStatus::Pending, TransactionStatus::Paid) => transaction.paid_at = Some(Utc::now()),
        (_, TransactionStatus::Pending) => transaction.paid_at = None,
        _ => {}
    }
    transaction.status = status;
}

fn apply_request(transaction: &mut Transaction, request: TransactionRequest) {
    if let Some(status) = request.status {
        set_status(transaction, status);
    }
    transaction.category = clean_optional(request.category);
    transaction.client_id = request.client_id;
    transaction.service_id = request.service_id;
    transaction.due_date = request.due_date;
}
