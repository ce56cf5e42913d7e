//! DTOs de la API
//!
//! Requests, filtros de búsqueda y responses expuestos por los endpoints.

pub mod admin_dto;
pub mod api_response;
pub mod audit_dto;
pub mod client_dto;
pub mod dashboard_dto;
pub mod service_dto;
pub mod transaction_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;

/// Tamaño máximo de página en los listados
pub const MAX_PAGE_SIZE: i64 = 1000;

/// `limit` de un listado acotado a `0..=MAX_PAGE_SIZE`; sin límite se devuelve todo
pub fn page_limit(limit: Option<i64>) -> Option<i64> {
    limit.map(|l| l.clamp(0, MAX_PAGE_SIZE))
}

/// `offset` de un listado, nunca negativo
pub fn page_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_limit(None), None);
        assert_eq!(page_limit(Some(-5)), Some(0));
        assert_eq!(page_limit(Some(20)), Some(20));
        assert_eq!(page_limit(Some(i64::MAX)), Some(MAX_PAGE_SIZE));
        assert_eq!(page_offset(None), 0);
        assert_eq!(page_offset(Some(-1)), 0);
        assert_eq!(page_offset(Some(40)), 40);
    }
}
