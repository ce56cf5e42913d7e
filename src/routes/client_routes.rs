use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::ClientController;
use crate::dto::client_dto::{ClientFilters, ClientRequest, ClientResponse};
use crate::dto::ApiResponse;
use crate::models::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_client_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
        .route("/:id/avatar", post(upload_avatar))
}

/// Content-Type de un upload; obligatorio
pub(crate) fn content_type(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("Content-Type requerido".to_string()))
}

async fn list_clients(
    State(state): State<AppState>,
    Query(filters): Query<ClientFilters>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.list(filters).await?))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientResponse>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<ClientRequest>,
) -> Result<Json<ApiResponse<ClientResponse>>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.create(&actor, request).await?))
}

async fn update_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ClientRequest>,
) -> Result<Json<ApiResponse<ClientResponse>>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.update(&actor, id, request).await?))
}

async fn delete_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.delete(&actor, id).await?))
}

async fn upload_avatar(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<ClientResponse>>, AppError> {
    let content_type = content_type(&headers)?;
    let controller = ClientController::new(&state);
    Ok(Json(controller.upload_avatar(&actor, id, &content_type, body).await?))
}
