//! Utilidades del sistema
//!
//! Este módulo contiene el manejo de errores, la verificación de tokens
//! y las validaciones de formato compartidas.

pub mod errors;
pub mod jwt;
pub mod validation;

pub use errors::{AppError, AppResult};
