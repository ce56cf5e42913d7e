use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::ServiceController;
use crate::dto::service_dto::{
    ChecklistItemRequest, CreatedServiceResponse, ServiceDetailResponse, ServiceFilters,
    ServiceRequest, ServiceResponse, ToggleChecklistItemRequest, UpdateServiceStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::{Actor, ServiceChecklistItem};
use crate::services::checklist_templates::{all_templates, ChecklistTemplate};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/:id", get(get_service).put(update_service).delete(delete_service))
        .route("/:id/status", put(update_status))
        .route("/:id/checklist", get(list_checklist).post(add_checklist_item))
        .route(
            "/:id/checklist/:item_id",
            put(toggle_checklist_item).delete(remove_checklist_item),
        )
}

pub async fn list_checklist_templates() -> Json<&'static [ChecklistTemplate]> {
    Json(all_templates())
}

async fn list_services(
    State(state): State<AppState>,
    Query(filters): Query<ServiceFilters>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.list(filters).await?))
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceDetailResponse>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_service(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<ApiResponse<CreatedServiceResponse>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.create(&actor, request).await?))
}

async fn update_service(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<ApiResponse<ServiceDetailResponse>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.update(&actor, id, request).await?))
}

async fn delete_service(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.delete(&actor, id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateServiceStatusRequest>,
) -> Result<Json<ApiResponse<ServiceDetailResponse>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.update_status(&actor, id, request).await?))
}

async fn list_checklist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ServiceChecklistItem>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.list_checklist(id).await?))
}

async fn add_checklist_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChecklistItemRequest>,
) -> Result<Json<ApiResponse<ServiceChecklistItem>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.add_checklist_item(&actor, id, request).await?))
}

async fn toggle_checklist_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ToggleChecklistItemRequest>,
) -> Result<Json<ApiResponse<ServiceChecklistItem>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.toggle_checklist_item(&actor, id, item_id, request).await?))
}

async fn remove_checklist_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ServiceController::new(&state);
    Ok(Json(controller.remove_checklist_item(&actor, id, item_id).await?))
}
