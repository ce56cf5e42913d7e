//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto de desarrollo salvo las credenciales.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, Utc};
use thiserror::Error;

use crate::services::expiration_alerts::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::services::financial_summary::DEFAULT_CASHFLOW_MONTHS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Dónde viven los registros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBackend {
    Postgres,
    Memory,
}

/// Dónde se guardan avatares e imágenes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Object,
    Filesystem,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub data_backend: DataBackend,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub cors_origins: Vec<String>,
    pub storage_backend: StorageKind,
    pub storage_url: Option<String>,
    pub storage_bucket: String,
    pub storage_service_key: Option<String>,
    pub storage_local_path: PathBuf,
    pub auth_url: Option<String>,
    pub auth_service_key: Option<String>,
    pub alert_window_days: i64,
    pub cashflow_months: usize,
    pub timezone_offset_hours: i32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            data_backend: DataBackend::Postgres,
            jwt_secret: String::new(),
            jwt_audience: None,
            cors_origins: Vec::new(),
            storage_backend: StorageKind::Filesystem,
            storage_url: None,
            storage_bucket: "despachante".to_string(),
            storage_service_key: None,
            storage_local_path: PathBuf::from("./uploads"),
            auth_url: None,
            auth_service_key: None,
            alert_window_days: DEFAULT_WINDOW_DAYS,
            cashflow_months: DEFAULT_CASHFLOW_MONTHS,
            // Brasília
            timezone_offset_hours: -3,
        }
    }
}

fn optional(var: &'static str) -> Option<String> {
    env::var(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(var) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

impl EnvironmentConfig {
    /// Lee la configuración del proceso. `JWT_SECRET` es obligatorio;
    /// con `STORAGE_BACKEND=object` también lo son `STORAGE_URL` y `STORAGE_SERVICE_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_backend = match optional("DATA_BACKEND").as_deref() {
            None | Some("postgres") => DataBackend::Postgres,
            Some("memory") => DataBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid { var: "DATA_BACKEND", value: other.to_string() })
            }
        };

        let storage_backend = match optional("STORAGE_BACKEND").as_deref() {
            None | Some("filesystem") => StorageKind::Filesystem,
            Some("object") => StorageKind::Object,
            Some(other) => {
                return Err(ConfigError::Invalid { var: "STORAGE_BACKEND", value: other.to_string() })
            }
        };

        let config = Self {
            environment: optional("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parsed("PORT", defaults.port)?,
            host: optional("HOST").unwrap_or(defaults.host),
            data_backend,
            jwt_secret: optional("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            jwt_audience: optional("JWT_AUDIENCE"),
            cors_origins: optional("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            storage_backend,
            storage_url: optional("STORAGE_URL"),
            storage_bucket: optional("STORAGE_BUCKET").unwrap_or(defaults.storage_bucket),
            storage_service_key: optional("STORAGE_SERVICE_KEY"),
            storage_local_path: optional("STORAGE_LOCAL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_local_path),
            auth_url: optional("AUTH_URL"),
            auth_service_key: optional("AUTH_SERVICE_KEY"),
            alert_window_days: parsed("ALERT_WINDOW_DAYS", defaults.alert_window_days)?,
            cashflow_months: parsed("CASHFLOW_MONTHS", defaults.cashflow_months)?,
            timezone_offset_hours: parsed("TIMEZONE_OFFSET_HOURS", defaults.timezone_offset_hours)?,
        };

        config.validate()
    }

    /// Reglas entre variables y rangos numéricos
    fn validate(self) -> Result<Self, ConfigError> {
        if self.storage_backend == StorageKind::Object {
            if self.storage_url.is_none() {
                return Err(ConfigError::Missing("STORAGE_URL"));
            }
            if self.storage_service_key.is_none() {
                return Err(ConfigError::Missing("STORAGE_SERVICE_KEY"));
            }
        }
        if !(-12..=14).contains(&self.timezone_offset_hours) {
            return Err(ConfigError::Invalid {
                var: "TIMEZONE_OFFSET_HOURS",
                value: self.timezone_offset_hours.to_string(),
            });
        }
        if !(0..=MAX_WINDOW_DAYS).contains(&self.alert_window_days) {
            return Err(ConfigError::Invalid {
                var: "ALERT_WINDOW_DAYS",
                value: self.alert_window_days.to_string(),
            });
        }

        Ok(self)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fecha de hoy en la zona horaria de la oficina
    pub fn today(&self) -> NaiveDate {
        let now = Utc::now();
        FixedOffset::east_opt(self.timezone_offset_hours * 3600)
            .map(|tz| now.with_timezone(&tz).date_naive())
            .unwrap_or_else(|| now.date_naive())
    }
}
