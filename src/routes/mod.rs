//! Router HTTP
//!
//! `/health` es público; todo lo que cuelga de `/api` exige un JWT válido.

pub mod admin_routes;
pub mod client_routes;
pub mod dashboard_routes;
pub mod service_routes;
pub mod transaction_routes;
pub mod vehicle_routes;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, require_auth};
use crate::state::AppState;

/// Tamaño máximo de avatares e imágenes de vehículos
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/clients", client_routes::create_client_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/services", service_routes::create_service_router())
        .nest("/transactions", transaction_routes::create_transaction_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .nest("/admin", admin_routes::create_admin_router())
        .route("/checklist-templates", get(service_routes::list_checklist_templates))
        .route("/audit-logs", get(admin_routes::list_audit_logs))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
