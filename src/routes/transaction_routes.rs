use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::TransactionController;
use crate::dto::transaction_dto::{TransactionFilters, TransactionRequest};
use crate::dto::ApiResponse;
use crate::models::{Actor, Transaction};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transaction_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route(
            "/:id",
            get(get_transaction).put(update_transaction).delete(delete_transaction),
        )
        .route("/:id/pay", post(pay_transaction))
}

async fn list_transactions(
    State(state): State<AppState>,
    Query(filters): Query<TransactionFilters>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let controller = TransactionController::new(&state);
    Ok(Json(controller.list(filters).await?))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    let controller = TransactionController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_transaction(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<TransactionRequest>,
) -> Result<Json<ApiResponse<Transaction>>, AppError> {
    let controller = TransactionController::new(&state);
    Ok(Json(controller.create(&actor, request).await?))
}

async fn update_transaction(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransactionRequest>,
) -> Result<Json<ApiResponse<Transaction>>, AppError> {
    let controller = TransactionController::new(&state);
    Ok(Json(controller.update(&actor, id, request).await?))
}

async fn delete_transaction(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TransactionController::new(&state);
    Ok(Json(controller.delete(&actor, id).await?))
}

async fn pay_transaction(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Transaction>>, AppError> {
    let controller = TransactionController::new(&state);
    Ok(Json(controller.mark_paid(&actor, id).await?))
}
