pub mod audit_repository;
pub mod checklist_repository;
pub mod client_repository;
pub mod data_store;
pub mod memory_store;
pub mod pg_store;
pub mod service_repository;
pub mod transaction_repository;
pub mod vehicle_repository;

pub use data_store::{DataStore, ServiceBundle, TransferPlan};
pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
