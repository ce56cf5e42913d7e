use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::VehicleController;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, TransferResponse, TransferVehicleRequest, VehicleFields, VehicleFilters,
    VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::models::Actor;
use crate::routes::client_routes::content_type;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/images", post(add_image))
        .route("/:id/images/:index", delete(remove_image))
        .route("/:id/transfer", post(transfer_vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.list(filters).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.create(&actor, request).await?))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(fields): Json<VehicleFields>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.update(&actor, id, fields).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.delete(&actor, id).await?))
}

async fn add_image(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let content_type = content_type(&headers)?;
    let controller = VehicleController::new(&state);
    Ok(Json(controller.add_image(&actor, id, &content_type, body).await?))
}

async fn remove_image(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.remove_image(&actor, id, index).await?))
}

async fn transfer_vehicle(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransferVehicleRequest>,
) -> Result<Json<ApiResponse<TransferResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    Ok(Json(controller.transfer(&actor, id, request).await?))
}
