//! Services module
//!
//! Este módulo contiene la lógica de negocio: clasificadores puros
//! (documentación, vencimientos, progreso, finanzas), armado de flujos
//! compuestos e integraciones externas (storage, Auth).

pub mod admin_auth_service;
pub mod audit_service;
pub mod checklist_templates;
pub mod document_status;
pub mod expiration_alerts;
pub mod financial_summary;
pub mod service_billing;
pub mod service_progress;
pub mod storage_service;
pub mod vehicle_transfer;

pub use admin_auth_service::AdminAuthClient;
pub use audit_service::AuditService;
pub use storage_service::{FilesystemStorage, ObjectStorage, StorageBackend};
