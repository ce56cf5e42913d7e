use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::AdminController;
use crate::dto::admin_dto::{AdminUser, InviteUserRequest};
use crate::dto::audit_dto::AuditLogFilters;
use crate::dto::ApiResponse;
use crate::models::{Actor, AuditLog};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(invite_user))
        .route("/users/:id", delete(remove_user))
}

pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(filters): Query<AuditLogFilters>,
) -> Result<Json<Vec<AuditLog>>, AppError> {
    let controller = AdminController::new(&state);
    Ok(Json(controller.audit_logs(filters).await?))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<AdminUser>>, AppError> {
    let controller = AdminController::new(&state);
    Ok(Json(controller.list_users().await?))
}

async fn invite_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<InviteUserRequest>,
) -> Result<Json<ApiResponse<AdminUser>>, AppError> {
    let controller = AdminController::new(&state);
    Ok(Json(controller.invite_user(&actor, request).await?))
}

async fn remove_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AdminController::new(&state);
    Ok(Json(controller.remove_user(&actor, id).await?))
}
