//! Middleware de autenticación JWT
//!
//! Verifica el token del servicio de Auth e inyecta el `Actor` en las
//! extensions de la request. Los handlers lo extraen con `Extension<Actor>`.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{bearer_token, verify_token};

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let claims = verify_token(
        token,
        &state.config.jwt_secret,
        state.config.jwt_audience.as_deref(),
    )?;
    let actor = claims.actor()?;

    debug!("🔐 {} {} por {}", request.method(), request.uri().path(), actor.user_id);
    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}
