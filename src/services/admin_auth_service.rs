//! Cliente de la API admin del servicio de Auth alojado
//!
//! Requiere la service key, que nunca sale del backend.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::admin_dto::{AdminUser, InviteUserRequest};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct UserList {
    users: Vec<AdminUser>,
}

pub struct AdminAuthClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl AdminAuthClient {
    pub fn new(client: reqwest::Client, base_url: &str, service_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/admin/users", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }

    async fn check(response: reqwest::Response, operation: &str) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("⚠️ Auth admin {} respondió {}: {}", operation, status, body);
        Err(AppError::ExternalApi(format!(
            "Servicio de Auth respondió {} en {}: {}",
            status, operation, body
        )))
    }

    pub async fn list_users(&self) -> AppResult<Vec<AdminUser>> {
        let response = self
            .authorized(self.client.get(self.users_url()))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error listando usuarios: {}", e)))?;

        let list: UserList = Self::check(response, "list_users")
            .await?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta inválida del servicio de Auth: {}", e)))?;

        Ok(list.users)
    }

    pub async fn create_user(&self, request: &InviteUserRequest) -> AppResult<AdminUser> {
        info!("👤 Creando usuario {}", request.email);

        let payload = json!({
            "email": request.email,
            "password": request.password,
            "email_confirm": true,
            "user_metadata": { "full_name": request.full_name },
        });

        let response = self
            .authorized(self.client.post(self.users_url()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error creando usuario: {}", e)))?;

        Self::check(response, "create_user")
            .await?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta inválida del servicio de Auth: {}", e)))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        info!("🗑️ Eliminando usuario {}", user_id);

        let response = self
            .authorized(self.client.delete(format!("{}/{}", self.users_url(), user_id)))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error eliminando usuario: {}", e)))?;

        Self::check(response, "delete_user").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_url_trims_trailing_slash() {
        let client = AdminAuthClient::new(reqwest::Client::new(), "https://proj.example.co/auth/v1/", "key");
        assert_eq!(client.users_url(), "https://proj.example.co/auth/v1/admin/users");
    }

    #[test]
    fn test_user_list_payload() {
        let body = r#"{"users":[{"id":"6f1c1a5e-8a0b-4f55-9f3e-1b2c3d4e5f60","email":"ana@example.com",
            "created_at":"2024-05-01T12:00:00Z","last_sign_in_at":null,"role":"authenticated"}]}"#;
        let list: UserList = serde_json::from_str(body).unwrap();
        assert_eq!(list.users.len(), 1);
        assert_eq!(list.users[0].email.as_deref(), Some("ana@example.com"));
        assert!(list.users[0].last_sign_in_at.is_none());
    }
}
