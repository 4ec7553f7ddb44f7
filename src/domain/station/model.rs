//! Charging station domain entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Physical charging plug standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorType {
    Ccs,
    Chademo,
    Type2,
    Tesla,
    J1772,
}

impl ConnectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ccs => "CCS",
            Self::Chademo => "CHAdeMO",
            Self::Type2 => "Type2",
            Self::Tesla => "Tesla",
            Self::J1772 => "J1772",
        }
    }

    /// Parse a connector type from its wire representation.
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "CCS" => Ok(Self::Ccs),
            "CHAdeMO" => Ok(Self::Chademo),
            "Type2" => Ok(Self::Type2),
            "Tesla" => Ok(Self::Tesla),
            "J1772" => Ok(Self::J1772),
            other => Err(DomainError::Validation(format!(
                "Unknown connector type: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Station operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStatus {
    /// Admits new reservations
    Active,
    /// Temporarily closed
    Inactive,
    /// Under maintenance
    Maintenance,
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "maintenance" => Self::Maintenance,
            _ => Self::Inactive,
        }
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capacity slot for one connector type at a station
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorCapacity {
    pub connector_type: ConnectorType,
    /// Maximum output power in kW
    pub power_kw: f64,
    /// Total physical units of this connector type
    pub count: u32,
    /// Cached count of currently free units. Display-only projection;
    /// admission decisions always recount live overlapping reservations.
    pub available: u32,
}

/// Station pricing. All rates are in `currency` units and non-negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pricing {
    pub per_kwh: Option<f64>,
    pub per_minute: Option<f64>,
    pub session_fee: Option<f64>,
    pub currency: String,
}

/// Postal address of a station
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Charging station
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub address: Address,
    pub latitude: f64,
    pub longitude: f64,
    pub connectors: Vec<ConnectorCapacity>,
    pub pricing: Pricing,
    pub status: StationStatus,
    /// Sum of connector counts; derived, recomputed on every write
    pub total_ports: u32,
    /// Sum of cached connector availability; derived, recomputed on every write
    pub available_ports: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    /// Whether this station admits new reservations.
    pub fn is_bookable(&self) -> bool {
        self.status == StationStatus::Active
    }

    /// Capacity entry for a connector type, if the station has one.
    pub fn connector_capacity(&self, connector_type: ConnectorType) -> Option<&ConnectorCapacity> {
        self.connectors
            .iter()
            .find(|c| c.connector_type == connector_type)
    }

    /// Recompute the derived port totals from the connector list.
    ///
    /// Must run inside every station write; the cached totals are never an
    /// input to admission decisions.
    pub fn recompute_port_totals(&mut self) {
        self.total_ports = self.connectors.iter().map(|c| c.count).sum();
        self.available_ports = self.connectors.iter().map(|c| c.available).sum();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_station() -> Station {
        Station {
            id: "st-001".into(),
            name: "Downtown Garage".into(),
            address: Address {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip_code: "62701".into(),
                country: "USA".into(),
            },
            latitude: 39.78,
            longitude: -89.65,
            connectors: vec![
                ConnectorCapacity {
                    connector_type: ConnectorType::Ccs,
                    power_kw: 150.0,
                    count: 4,
                    available: 3,
                },
                ConnectorCapacity {
                    connector_type: ConnectorType::Type2,
                    power_kw: 22.0,
                    count: 2,
                    available: 2,
                },
            ],
            pricing: Pricing {
                per_kwh: Some(0.30),
                per_minute: None,
                session_fee: None,
                currency: "USD".into(),
            },
            status: StationStatus::Active,
            total_ports: 0,
            available_ports: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn connector_type_roundtrip() {
        for ct in &[
            ConnectorType::Ccs,
            ConnectorType::Chademo,
            ConnectorType::Type2,
            ConnectorType::Tesla,
            ConnectorType::J1772,
        ] {
            assert_eq!(ConnectorType::parse(ct.as_str()).unwrap(), *ct);
        }
    }

    #[test]
    fn unknown_connector_type_is_rejected() {
        assert!(ConnectorType::parse("GB/T").is_err());
    }

    #[test]
    fn station_status_unknown_defaults_to_inactive() {
        assert_eq!(StationStatus::from_str("???"), StationStatus::Inactive);
    }

    #[test]
    fn only_active_stations_are_bookable() {
        let mut s = sample_station();
        assert!(s.is_bookable());
        s.status = StationStatus::Maintenance;
        assert!(!s.is_bookable());
        s.status = StationStatus::Inactive;
        assert!(!s.is_bookable());
    }

    #[test]
    fn connector_capacity_lookup() {
        let s = sample_station();
        assert_eq!(s.connector_capacity(ConnectorType::Ccs).unwrap().count, 4);
        assert!(s.connector_capacity(ConnectorType::Tesla).is_none());
    }

    #[test]
    fn port_totals_recomputed_from_connectors() {
        let mut s = sample_station();
        s.recompute_port_totals();
        assert_eq!(s.total_ports, 6);
        assert_eq!(s.available_ports, 5);

        s.connectors[0].available = 0;
        s.recompute_port_totals();
        assert_eq!(s.available_ports, 2);
    }
}
