use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{AdminUser, InviteUserRequest};
use crate::dto::audit_dto::AuditLogFilters;
use crate::dto::ApiResponse;
use crate::models::{Actor, AuditAction, AuditLog, EntityType};
use crate::repositories::DataStore;
use crate::services::{AdminAuthClient, AuditService};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Usuarios del panel (vía API admin de Auth) y consulta de auditoría
pub struct AdminController {
    store: Arc<dyn DataStore>,
    admin_auth: Option<Arc<AdminAuthClient>>,
}

impl AdminController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            admin_auth: state.admin_auth.clone(),
        }
    }

    fn auth_client(&self) -> Result<&AdminAuthClient, AppError> {
        self.admin_auth
            .as_deref()
            .ok_or_else(|| AppError::Internal("Gestão de usuários não configurada".to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<AdminUser>, AppError> {
        self.auth_client()?.list_users().await
    }

    pub async fn invite_user(
        &self,
        actor: &Actor,
        request: InviteUserRequest,
    ) -> Result<ApiResponse<AdminUser>, AppError> {
        request.validate()?;
        let user = self.auth_client()?.create_user(&request).await?;

        AuditService::new(self.store.as_ref())
            .record(
                actor,
                AuditAction::UserInvited,
                EntityType::User,
                user.id,
                json!({ "email": user.email }),
            )
            .await?;

        Ok(ApiResponse::success_with_message(user, "Usuário criado com sucesso"))
    }

    pub async fn remove_user(&self, actor: &Actor, user_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if user_id == actor.user_id {
            return Err(AppError::BadRequest("Não é possível remover o próprio usuário".to_string()));
        }
        self.auth_client()?.delete_user(user_id).await?;

        AuditService::new(self.store.as_ref())
            .record(actor, AuditAction::UserRemoved, EntityType::User, user_id, json!({}))
            .await?;

        Ok(ApiResponse::message("Usuário removido com sucesso"))
    }

    pub async fn audit_logs(&self, filters: AuditLogFilters) -> Result<Vec<AuditLog>, AppError> {
        self.store.list_audit_logs(&filters).await
    }
}
