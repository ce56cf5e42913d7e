use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::DashboardController;
use crate::dto::dashboard_dto::{FinancialQuery, OverviewResponse};
use crate::services::expiration_alerts::ExpirationAlert;
use crate::services::financial_summary::FinancialSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(get_alerts))
        .route("/financial", get(get_financial))
        .route("/overview", get(get_overview))
}

async fn get_alerts(State(state): State<AppState>) -> Result<Json<Vec<ExpirationAlert>>, AppError> {
    let controller = DashboardController::new(&state);
    Ok(Json(controller.alerts().await?))
}

async fn get_financial(
    State(state): State<AppState>,
    Query(query): Query<FinancialQuery>,
) -> Result<Json<FinancialSummary>, AppError> {
    let controller = DashboardController::new(&state);
    Ok(Json(controller.financial(query.months).await?))
}

async fn get_overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, AppError> {
    let controller = DashboardController::new(&state);
    Ok(Json(controller.overview().await?))
}
