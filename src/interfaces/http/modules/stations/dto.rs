//! Station DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::station::{Address, ConnectorCapacity, Pricing, Station};

/// Connector capacity entry in requests and responses
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConnectorCapacityDto {
    /// Connector type: CCS, CHAdeMO, Type2, Tesla, J1772
    pub connector_type: String,
    /// Maximum output power in kW
    #[validate(range(min = 0.0))]
    pub power_kw: f64,
    /// Total physical units
    pub count: u32,
    /// Currently free units (cached; defaults to `count`)
    pub available: Option<u32>,
}

/// Station pricing
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PricingDto {
    #[validate(range(min = 0.0))]
    pub per_kwh: Option<f64>,
    #[validate(range(min = 0.0))]
    pub per_minute: Option<f64>,
    #[validate(range(min = 0.0))]
    pub session_fee: Option<f64>,
    /// ISO 4217 code
    #[serde(default = "default_currency")]
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl From<PricingDto> for Pricing {
    fn from(dto: PricingDto) -> Self {
        Pricing {
            per_kwh: dto.per_kwh,
            per_minute: dto.per_minute,
            session_fee: dto.session_fee,
            currency: dto.currency,
        }
    }
}

/// Postal address
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddressDto {
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 20))]
    pub zip_code: String,
    #[serde(default = "default_country")]
    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

fn default_country() -> String {
    "USA".to_string()
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Address {
            street: dto.street,
            city: dto.city,
            state: dto.state,
            zip_code: dto.zip_code,
            country: dto.country,
        }
    }
}

/// Request to create or replace a station
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(nested)]
    pub address: AddressDto,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(
        length(min = 1, message = "at least one connector type is required"),
        nested
    )]
    pub connectors: Vec<ConnectorCapacityDto>,
    #[validate(nested)]
    pub pricing: PricingDto,
    /// active, inactive or maintenance. Default: active
    pub status: Option<String>,
}

/// Station details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct StationDto {
    pub id: String,
    pub name: String,
    pub address: AddressDto,
    pub latitude: f64,
    pub longitude: f64,
    pub connectors: Vec<ConnectorCapacityDto>,
    pub pricing: PricingDto,
    pub status: String,
    pub total_ports: u32,
    pub available_ports: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Station> for StationDto {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            address: AddressDto {
                street: s.address.street,
                city: s.address.city,
                state: s.address.state,
                zip_code: s.address.zip_code,
                country: s.address.country,
            },
            latitude: s.latitude,
            longitude: s.longitude,
            connectors: s
                .connectors
                .into_iter()
                .map(|c: ConnectorCapacity| ConnectorCapacityDto {
                    connector_type: c.connector_type.as_str().to_string(),
                    power_kw: c.power_kw,
                    count: c.count,
                    available: Some(c.available),
                })
                .collect(),
            pricing: PricingDto {
                per_kwh: s.pricing.per_kwh,
                per_minute: s.pricing.per_minute,
                session_fee: s.pricing.session_fee,
                currency: s.pricing.currency,
            },
            status: s.status.as_str().to_string(),
            total_ports: s.total_ports,
            available_ports: s.available_ports,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for station search
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ListStationsParams {
    pub city: Option<String>,
    pub state: Option<String>,
    /// Filter to stations offering this connector type
    pub connector_type: Option<String>,
    /// active, inactive or maintenance
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Query parameters for the availability check
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AvailabilityParams {
    /// Connector type to check
    pub connector_type: String,
    /// Window start (RFC 3339)
    pub start: chrono::DateTime<chrono::Utc>,
    /// Window end (RFC 3339)
    pub end: chrono::DateTime<chrono::Utc>,
}

/// A reserved slot conflicting with the requested window
#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictingSlotDto {
    pub start_time: String,
    pub end_time: String,
}

/// Advisory availability report.
///
/// A snapshot only: another booking may claim the slot between this answer
/// and a subsequent reservation attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub is_available: bool,
    pub total_connectors: u32,
    pub available_connectors: u32,
    pub reserved_connectors: u32,
    pub conflicting_reservations: Vec<ConflictingSlotDto>,
}
