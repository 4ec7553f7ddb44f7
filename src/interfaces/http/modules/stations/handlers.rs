//! Station HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::scheduling::ReservationService;
use crate::application::services::{StationInput, StationService};
use crate::auth::AuthenticatedUser;
use crate::domain::station::{ConnectorCapacity, ConnectorType, StationFilter, StationStatus};
use crate::domain::{DomainError, DomainResult};
use crate::interfaces::http::common::{
    clamp_pagination, domain_error, forbidden, ApiError, ApiResponse, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::modules::reservations::{parse_reservation_status, ReservationDto};

use super::dto::*;

/// Application state for station handlers
#[derive(Clone)]
pub struct StationAppState {
    pub station_service: Arc<StationService>,
    pub reservation_service: Arc<ReservationService>,
}

fn parse_status(s: &str) -> DomainResult<StationStatus> {
    match s {
        "active" => Ok(StationStatus::Active),
        "inactive" => Ok(StationStatus::Inactive),
        "maintenance" => Ok(StationStatus::Maintenance),
        other => Err(DomainError::Validation(format!(
            "Unknown station status: {}",
            other
        ))),
    }
}

fn to_station_input(request: StationRequest) -> DomainResult<StationInput> {
    let connectors = request
        .connectors
        .into_iter()
        .map(|c| {
            Ok(ConnectorCapacity {
                connector_type: ConnectorType::parse(&c.connector_type)?,
                power_kw: c.power_kw,
                count: c.count,
                available: c.available.unwrap_or(c.count),
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    let status = match request.status.as_deref() {
        Some(s) => parse_status(s)?,
        None => StationStatus::Active,
    };

    Ok(StationInput {
        name: request.name,
        address: request.address.into(),
        latitude: request.latitude,
        longitude: request.longitude,
        connectors,
        pricing: request.pricing.into(),
        status,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    params(ListStationsParams),
    responses(
        (status = 200, description = "Station list", body = PaginatedResponse<StationDto>)
    )
)]
pub async fn list_stations(
    State(state): State<StationAppState>,
    Query(params): Query<ListStationsParams>,
) -> Result<Json<PaginatedResponse<StationDto>>, ApiError> {
    let connector_type = params
        .connector_type
        .as_deref()
        .map(ConnectorType::parse)
        .transpose()
        .map_err(domain_error)?;
    let status = params
        .status
        .as_deref()
        .map(parse_status)
        .transpose()
        .map_err(domain_error)?;

    let filter = StationFilter {
        city: params.city,
        state: params.state,
        connector_type,
        status,
    };
    let (page, limit) = clamp_pagination(params.page, params.limit);

    let (stations, total) = state
        .station_service
        .search(&filter, page, limit)
        .await
        .map_err(domain_error)?;

    let items: Vec<StationDto> = stations.into_iter().map(StationDto::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = String, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_station(
    State(state): State<StationAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StationDto>>, ApiError> {
    let station = state.station_service.get(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(StationDto::from(station))))
}

#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    security(("bearer_auth" = [])),
    request_body = StationRequest,
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationDto>),
        (status = 403, description = "Administrator access required"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_station(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<StationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationDto>>), ApiError> {
    if !user.is_admin() {
        return Err(forbidden());
    }

    let input = to_station_input(request).map_err(domain_error)?;
    let station = state
        .station_service
        .create(input)
        .await
        .map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StationDto::from(station))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Station ID")),
    request_body = StationRequest,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationDto>),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_station(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<StationRequest>,
) -> Result<Json<ApiResponse<StationDto>>, ApiError> {
    if !user.is_admin() {
        return Err(forbidden());
    }

    let input = to_station_input(request).map_err(domain_error)?;
    let station = state
        .station_service
        .update(&id, input)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(StationDto::from(station))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station deleted"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_station(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !user.is_admin() {
        return Err(forbidden());
    }

    state
        .station_service
        .delete(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}/availability",
    tag = "Stations",
    params(("id" = String, Path, description = "Station ID"), AvailabilityParams),
    responses(
        (status = 200, description = "Advisory availability report", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "Invalid window or connector type"),
        (status = 404, description = "Station unavailable")
    )
)]
pub async fn check_availability(
    State(state): State<StationAppState>,
    Path(id): Path<String>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ApiError> {
    let connector_type =
        ConnectorType::parse(&params.connector_type).map_err(domain_error)?;

    let report = state
        .reservation_service
        .check_availability(&id, connector_type, params.start, params.end)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(AvailabilityDto {
        is_available: report.is_available,
        total_connectors: report.total_connectors,
        available_connectors: report.available_connectors,
        reserved_connectors: report.reserved_connectors,
        conflicting_reservations: report
            .conflicting
            .into_iter()
            .map(|r| ConflictingSlotDto {
                start_time: r.window.start.to_rfc3339(),
                end_time: r.window.end.to_rfc3339(),
            })
            .collect(),
    })))
}

/// Query parameters for a station's reservation list
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
pub struct StationReservationsParams {
    /// Filter by reservation status
    pub status: Option<String>,
    /// Only windows touching this calendar date (YYYY-MM-DD)
    pub date: Option<chrono::NaiveDate>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}/reservations",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Station ID"), StationReservationsParams),
    responses(
        (status = 200, description = "Station reservations ordered by start time", body = PaginatedResponse<ReservationDto>),
        (status = 403, description = "Administrator access required")
    )
)]
pub async fn list_station_reservations(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Query(params): Query<StationReservationsParams>,
) -> Result<Json<PaginatedResponse<ReservationDto>>, ApiError> {
    if !user.is_admin() {
        return Err(forbidden());
    }

    let status = params
        .status
        .as_deref()
        .map(parse_reservation_status)
        .transpose()
        .map_err(domain_error)?;
    let (page, limit) = clamp_pagination(params.page, params.limit);

    let (reservations, total) = state
        .reservation_service
        .list_for_station(&id, status, params.date, page, limit)
        .await
        .map_err(domain_error)?;

    let items: Vec<ReservationDto> = reservations.into_iter().map(ReservationDto::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}
