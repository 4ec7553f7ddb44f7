//! Domain errors
//!
//! Every business-rule violation is a typed variant returned to the caller;
//! only `Database` represents an unexpected infrastructure failure.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::reservation::{ReservationStatus, TimeWindow};
use super::station::ConnectorType;

/// Domain-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Charging station {0} is not available")]
    StationUnavailable(String),

    #[error("Connector type {connector_type} is not available at station {station_id}")]
    ConnectorTypeNotSupported {
        station_id: String,
        connector_type: ConnectorType,
    },

    #[error("No available {connector_type} connector for the requested time slot ({} conflicting reservation(s): {})", .conflicts.len(), format_windows(.conflicts))]
    NoAvailableConnector {
        connector_type: ConnectorType,
        conflicts: Vec<TimeWindow>,
    },

    #[error("Invalid time window: {0}")]
    InvalidTimeWindow(String),

    #[error("Cannot {action} a reservation in status {from}: requires status {required}")]
    InvalidTransition {
        action: &'static str,
        from: ReservationStatus,
        required: &'static str,
    },

    #[error("Reservation start time {starts_at} has not arrived yet")]
    NotYetStarted { starts_at: DateTime<Utc> },

    #[error("Reservation expired at {ended_at}")]
    Expired { ended_at: DateTime<Utc> },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

fn format_windows(windows: &[TimeWindow]) -> String {
    windows
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_precondition() {
        let err = DomainError::InvalidTransition {
            action: "start",
            from: ReservationStatus::Pending,
            required: "confirmed",
        };
        assert_eq!(
            err.to_string(),
            "Cannot start a reservation in status pending: requires status confirmed"
        );
    }

    #[test]
    fn not_found_formats_entity_and_field() {
        let err = DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: "r-42".into(),
        };
        assert_eq!(err.to_string(), "Not found: Reservation with id=r-42");
    }
}
