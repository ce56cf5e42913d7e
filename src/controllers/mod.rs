//! Controllers
//!
//! Orquestan validación, store, storage y auditoría para cada operación.
//! Se construyen por request a partir del `AppState`.

pub mod admin_controller;
pub mod client_controller;
pub mod dashboard_controller;
pub mod service_controller;
pub mod transaction_controller;
pub mod vehicle_controller;

pub use admin_controller::AdminController;
pub use client_controller::ClientController;
pub use dashboard_controller::DashboardController;
pub use service_controller::ServiceController;
pub use transaction_controller::TransactionController;
pub use vehicle_controller::VehicleController;
