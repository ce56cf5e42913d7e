//! Sistema de manejo de errores
//!
//! Taxonomía de errores de la API y su conversión a respuestas HTTP.
//! Toda respuesta de error lleva un `code` estable para el frontend.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    /// Un paso de un flujo compuesto falló después de que otro ya fue confirmado
    #[error("Partial workflow failure: {0}")]
    PartialWorkflow(String),
}

/// Cuerpo JSON de una respuesta de error
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    code: &'static str,
}

impl AppError {
    /// Código estable que acompaña cada respuesta de error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::ExternalApi(_) => "EXTERNAL_API_ERROR",
            AppError::PartialWorkflow(_) => "PARTIAL_WORKFLOW",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::PartialWorkflow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Título, mensaje para el usuario y detalles opcionales.
    /// Los fallos remotos no exponen la causa en `message`, sólo en `details`.
    fn describe(self) -> (&'static str, String, Option<Value>) {
        match self {
            AppError::Database(e) => (
                "Database Error",
                "Não foi possível acessar os dados".to_string(),
                Some(json!({ "sql_error": e.to_string() })),
            ),
            AppError::Validation(e) => (
                "Validation Error",
                "Os dados informados são inválidos".to_string(),
                Some(json!(e)),
            ),
            AppError::Unauthorized(msg) => ("Unauthorized", msg, None),
            AppError::Forbidden(msg) => ("Forbidden", msg, None),
            AppError::NotFound(msg) => ("Not Found", msg, None),
            AppError::Conflict(msg) => ("Conflict", msg, None),
            AppError::BadRequest(msg) => ("Bad Request", msg, None),
            AppError::Internal(msg) => (
                "Internal Server Error",
                "Erro inesperado".to_string(),
                Some(json!({ "internal_error": msg })),
            ),
            AppError::ExternalApi(msg) => (
                "External API Error",
                "Falha ao comunicar com serviço externo".to_string(),
                Some(json!({ "external_api_error": msg })),
            ),
            // el usuario necesita saber qué quedó aplicado
            AppError::PartialWorkflow(msg) => ("Partial Workflow Failure", msg, None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        if status.is_server_error() {
            error!("❌ [{}] {}", code, self);
        } else if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::CONFLICT) {
            warn!("⚠️ [{}] {}", code, self);
        }

        let (error, message, details) = self.describe();
        let body = ErrorResponse {
            error,
            message,
            details,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}
