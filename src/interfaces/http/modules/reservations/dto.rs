//! Reservation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::reservation::{PaymentInfo, PaymentMethod, Reservation, VehicleInfo};
use crate::domain::DomainResult;

/// Vehicle details used for cost estimation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VehicleInfoDto {
    #[validate(length(max = 50))]
    pub make: Option<String>,
    #[validate(length(max = 50))]
    pub model: Option<String>,
    /// Battery capacity in kWh
    #[validate(range(min = 0.0))]
    pub battery_capacity_kwh: Option<f64>,
    /// Current state of charge, 0–100
    #[validate(range(min = 0, max = 100))]
    pub current_charge_percent: Option<u8>,
}

impl From<VehicleInfoDto> for VehicleInfo {
    fn from(dto: VehicleInfoDto) -> Self {
        VehicleInfo {
            make: dto.make,
            model: dto.model,
            battery_capacity_kwh: dto.battery_capacity_kwh,
            current_charge_percent: dto.current_charge_percent,
        }
    }
}

/// Payment record supplied at completion
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PaymentInfoDto {
    /// credit_card, paypal, apple_pay or google_pay
    pub method: String,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
}

impl PaymentInfoDto {
    pub fn into_domain(self) -> DomainResult<PaymentInfo> {
        Ok(PaymentInfo {
            method: PaymentMethod::parse(&self.method)?,
            transaction_id: self.transaction_id,
        })
    }
}

/// Request to create a new reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1))]
    pub station_id: String,
    /// Connector type: CCS, CHAdeMO, Type2, Tesla, J1772
    pub connector_type: String,
    /// Window start (RFC 3339); must be in the future
    pub start_time: DateTime<Utc>,
    /// Window end (RFC 3339); must be after `start_time`
    pub end_time: DateTime<Utc>,
    #[validate(nested)]
    pub vehicle_info: Option<VehicleInfoDto>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request to update a reservation. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservationRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub vehicle_info: Option<VehicleInfoDto>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request to complete a charging session
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteReservationRequest {
    /// Final session cost; overwrites the estimate when present
    #[validate(range(min = 0.0))]
    pub actual_cost: Option<f64>,
    #[validate(nested)]
    pub payment_info: Option<PaymentInfoDto>,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub connector_type: String,
    pub start_time: String,
    pub end_time: String,
    pub estimated_cost: f64,
    pub status: String,
    pub vehicle_info: Option<VehicleInfoDto>,
    pub payment_info: Option<PaymentInfoDto>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            station_id: r.station_id,
            connector_type: r.connector_type.as_str().to_string(),
            start_time: r.window.start.to_rfc3339(),
            end_time: r.window.end.to_rfc3339(),
            estimated_cost: r.estimated_cost,
            status: r.status.as_str().to_string(),
            vehicle_info: r.vehicle_info.map(|v| VehicleInfoDto {
                make: v.make,
                model: v.model,
                battery_capacity_kwh: v.battery_capacity_kwh,
                current_charge_percent: v.current_charge_percent,
            }),
            payment_info: r.payment_info.map(|p| PaymentInfoDto {
                method: p.method.as_str().to_string(),
                transaction_id: p.transaction_id,
            }),
            notes: r.notes,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the caller's reservation list
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ListReservationsParams {
    /// Filter by status: pending, confirmed, active, completed, cancelled
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
