//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Client;

use crate::config::environment::{EnvironmentConfig, StorageKind};
use crate::repositories::DataStore;
use crate::services::{AdminAuthClient, FilesystemStorage, ObjectStorage, StorageBackend};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub store: Arc<dyn DataStore>,
    pub storage: Arc<dyn StorageBackend>,
    /// Ausente si no se configuró `AUTH_URL` / `AUTH_SERVICE_KEY`
    pub admin_auth: Option<Arc<AdminAuthClient>>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        store: Arc<dyn DataStore>,
        storage: Arc<dyn StorageBackend>,
        admin_auth: Option<Arc<AdminAuthClient>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            storage,
            admin_auth,
        }
    }

    /// Arma storage y cliente de Auth a partir de la configuración
    pub fn from_config(config: EnvironmentConfig, store: Arc<dyn DataStore>) -> Self {
        let http_client = Client::new();

        let storage: Arc<dyn StorageBackend> = match (
            config.storage_backend,
            config.storage_url.as_deref(),
            config.storage_service_key.as_deref(),
        ) {
            (StorageKind::Object, Some(url), Some(key)) => Arc::new(ObjectStorage::new(
                http_client.clone(),
                url,
                &config.storage_bucket,
                key,
            )),
            _ => Arc::new(FilesystemStorage::new(config.storage_local_path.clone())),
        };

        let admin_auth = match (config.auth_url.as_deref(), config.auth_service_key.as_deref()) {
            (Some(url), Some(key)) => Some(Arc::new(AdminAuthClient::new(http_client, url, key))),
            _ => {
                tracing::warn!("⚠️ AUTH_URL/AUTH_SERVICE_KEY no configurados: /api/admin deshabilitado");
                None
            }
        };

        Self::new(config, store, storage, admin_auth)
    }

    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }
}
