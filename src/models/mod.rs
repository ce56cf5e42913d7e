//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod actor;
pub mod audit_log;
pub mod checklist;
pub mod client;
pub mod service;
pub mod transaction;
pub mod vehicle;

pub use actor::Actor;
pub use audit_log::{AuditAction, AuditLog, EntityType};
pub use checklist::ServiceChecklistItem;
pub use client::{Client, ClientType, DocStatus};
pub use service::{Service, ServiceStatus};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use vehicle::{Vehicle, MAX_VEHICLE_IMAGES};
