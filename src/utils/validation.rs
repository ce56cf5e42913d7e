//! Utilidades de validación
//!
//! Funciones helper para validación de documentos brasileños, placas
//! y valores monetarios. Los errores usan `validator::ValidationError`
//! para que se serialicen igual que los de `#[derive(Validate)]`.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::AppError;

lazy_static! {
    // Placa antigua (ABC1234) o Mercosul (ABC1D23)
    static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z]{3}[0-9][A-Z0-9][0-9]{2}$").unwrap();
    // Chassi: 17 caracteres, sin I, O ni Q
    static ref CHASSIS_REGEX: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
}

/// Un campo opcional de texto se considera vacío si es None o sólo espacios
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Normaliza un texto opcional: recorta y convierte "" en None
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Conserva sólo los dígitos
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normaliza una placa: mayúsculas, sin guiones ni espacios
pub fn normalize_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Validar CPF (11 dígitos) o CNPJ (14 dígitos)
pub fn validate_tax_id(value: &str) -> Result<(), ValidationError> {
    let digits = digits_only(value);
    if digits.len() != 11 && digits.len() != 14 {
        let mut error = ValidationError::new("tax_id");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"CPF (11) or CNPJ (14) digits".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de placa (antiga o Mercosul)
pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    if !PLATE_REGEX.is_match(&normalize_plate(value)) {
        let mut error = ValidationError::new("plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"ABC1234 or ABC1D23".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar chassi (VIN)
pub fn validate_chassis(value: &str) -> Result<(), ValidationError> {
    if !CHASSIS_REGEX.is_match(&value.trim().to_uppercase()) {
        let mut error = ValidationError::new("chassis");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar RENAVAM (9 a 11 dígitos)
pub fn validate_renavam(value: &str) -> Result<(), ValidationError> {
    let digits = digits_only(value);
    if digits.len() < 9 || digits.len() > 11 || digits.len() != value.trim().len() {
        let mut error = ValidationError::new("renavam");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Valores monetarios: como máximo dos decimales (ceros finales no cuentan)
pub fn validate_money_scale(value: Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > 2 {
        let mut error = ValidationError::new("decimal_places");
        error.add_param("value".into(), &value);
        error.add_param("max".into(), &2);
        return Err(error);
    }
    Ok(())
}

/// Acumula errores de validación manual por campo
pub struct FieldErrors {
    errors: ValidationErrors,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    pub fn check(&mut self, field: &'static str, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.errors.add(field, error);
        }
    }

    /// Convierte lo acumulado en `AppError::Validation` si hubo algún error
    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}
