//! Shared HTTP types: response envelope, pagination, error mapping

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Standard response envelope.
///
/// Every REST endpoint wraps its payload in this.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Pagination query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1–100). Default: 10
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Clamp raw pagination input to sane bounds
pub fn clamp_pagination(page: u32, limit: u32) -> (u32, u32) {
    (page.max(1), limit.clamp(1, 100))
}

/// Paginated response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Total item count across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total page count
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Error half of a handler result
pub type ApiError = (StatusCode, Json<ApiResponse<EmptyData>>);

/// Map a domain error to its HTTP representation.
///
/// Ownership failures arrive here already folded into `NotFound`, so the
/// mapping cannot leak existence of foreign resources.
pub fn domain_error(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::NotFound { .. } | DomainError::StationUnavailable(_) => StatusCode::NOT_FOUND,
        DomainError::ConnectorTypeNotSupported { .. }
        | DomainError::InvalidTimeWindow(_)
        | DomainError::InvalidTransition { .. }
        | DomainError::NotYetStarted { .. }
        | DomainError::Expired { .. }
        | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NoAvailableConnector { .. } | DomainError::Conflict(_) => {
            StatusCode::CONFLICT
        }
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Internal error serving request: {}", err);
        // do not leak infrastructure details to clients
        return (status, Json(ApiResponse::error("Internal server error")));
    }

    (status, Json(ApiResponse::error(err.to_string())))
}

/// Shortcut for a 403 on admin-only routes
pub fn forbidden() -> ApiError {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::error("Administrator access required")),
    )
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectorType;

    #[test]
    fn pagination_clamps_bounds() {
        assert_eq!(clamp_pagination(0, 0), (1, 1));
        assert_eq!(clamp_pagination(3, 50), (3, 50));
        assert_eq!(clamp_pagination(1, 1000), (1, 100));
    }

    #[test]
    fn total_pages_rounds_up() {
        let p: PaginatedResponse<u32> = PaginatedResponse::new(vec![1, 2, 3], 11, 1, 5);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn capacity_exhaustion_maps_to_conflict() {
        let (status, _) = domain_error(DomainError::NoAvailableConnector {
            connector_type: ConnectorType::Ccs,
            conflicts: vec![],
        });
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let (status, _) = domain_error(DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: "x".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_is_opaque_500() {
        let (status, Json(body)) = domain_error(DomainError::Database(
            sea_orm::DbErr::Custom("secret pool detail".into()),
        ));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.unwrap().contains("secret"));
    }
}
