//! Reservation HTTP handlers
//!
//! Thin adapters over `ReservationService`; every lifecycle rule lives in
//! the service, not here.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::scheduling::{
    CreateReservation, ReservationService, UpdateReservation,
};
use crate::auth::AuthenticatedUser;
use crate::domain::reservation::ReservationStatus;
use crate::domain::station::ConnectorType;
use crate::domain::{DomainError, DomainResult};
use crate::interfaces::http::common::{
    clamp_pagination, domain_error, forbidden, ApiError, ApiResponse, PaginatedResponse,
    ValidatedJson,
};

use super::dto::*;

pub(crate) fn parse_reservation_status(s: &str) -> DomainResult<ReservationStatus> {
    match s {
        "pending" => Ok(ReservationStatus::Pending),
        "confirmed" => Ok(ReservationStatus::Confirmed),
        "active" => Ok(ReservationStatus::Active),
        "completed" => Ok(ReservationStatus::Completed),
        "cancelled" => Ok(ReservationStatus::Cancelled),
        other => Err(DomainError::Validation(format!(
            "Unknown reservation status: {}",
            other
        ))),
    }
}

/// Application state for reservation handlers
#[derive(Clone)]
pub struct ReservationAppState {
    pub reservation_service: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created (pending)", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid window or connector type"),
        (status = 404, description = "Station unavailable"),
        (status = 409, description = "No available connector for the window"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let connector_type =
        ConnectorType::parse(&request.connector_type).map_err(domain_error)?;

    let reservation = state
        .reservation_service
        .create(
            &user.user_id,
            CreateReservation {
                station_id: request.station_id,
                connector_type,
                start_time: request.start_time,
                end_time: request.end_time,
                vehicle_info: request.vehicle_info.map(Into::into),
                notes: request.notes,
            },
        )
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(reservation))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(ListReservationsParams),
    responses(
        (status = 200, description = "Caller's reservations, newest first", body = PaginatedResponse<ReservationDto>)
    )
)]
pub async fn list_my_reservations(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListReservationsParams>,
) -> Result<Json<PaginatedResponse<ReservationDto>>, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(parse_reservation_status)
        .transpose()
        .map_err(domain_error)?;
    let (page, limit) = clamp_pagination(params.page, params.limit);

    let (reservations, total) = state
        .reservation_service
        .list_for_user(&user.user_id, status, page, limit)
        .await
        .map_err(domain_error)?;

    let items: Vec<ReservationDto> = reservations.into_iter().map(ReservationDto::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found (including foreign reservations)")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state
        .reservation_service
        .get(&user.user_id, &id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid window or terminal status"),
        (status = 404, description = "Not found"),
        (status = 409, description = "No available connector for the new window")
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state
        .reservation_service
        .update(
            &user.user_id,
            &id,
            UpdateReservation {
                start_time: request.start_time,
                end_time: request.end_time,
                vehicle_info: request.vehicle_info.map(Into::into),
                notes: request.notes,
            },
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Already terminal"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state
        .reservation_service
        .cancel(&user.user_id, &id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/confirm",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Not pending"),
        (status = 403, description = "Administrator access required"),
        (status = 409, description = "Capacity exhausted at confirmation")
    )
)]
pub async fn confirm_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    // confirmation is an operator action, not an owner action
    if !user.is_admin() {
        return Err(forbidden());
    }

    let reservation = state
        .reservation_service
        .confirm(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/start",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Charging session started", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Not confirmed, not yet started, or expired"),
        (status = 404, description = "Not found")
    )
)]
pub async fn start_charging_session(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state
        .reservation_service
        .start(&user.user_id, &id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/complete",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = CompleteReservationRequest,
    responses(
        (status = 200, description = "Charging session completed", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Not active"),
        (status = 404, description = "Not found")
    )
)]
pub async fn complete_charging_session(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CompleteReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let payment_info = request
        .payment_info
        .map(PaymentInfoDto::into_domain)
        .transpose()
        .map_err(domain_error)?;

    let reservation = state
        .reservation_service
        .complete(&user.user_id, &id, request.actual_cost, payment_info)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}/permanent",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation permanently deleted"),
        (status = 400, description = "Not in a terminal status"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .reservation_service
        .delete(&user.user_id, &id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
