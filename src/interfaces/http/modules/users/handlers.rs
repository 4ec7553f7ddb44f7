//! User profile and favorites handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::UserService;
use crate::auth::AuthenticatedUser;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::auth::UserDto;
use crate::interfaces::http::modules::stations::StationDto;

use super::dto::UpdateProfileRequest;

/// Application state for user handlers
#[derive(Clone)]
pub struct UserAppState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = ApiResponse<UserDto>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    State(state): State<UserAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let profile = state
        .user_service
        .get_profile(&user.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(profile))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserDto>),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn update_profile(
    State(state): State<UserAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let profile = state
        .user_service
        .update_profile(&user.user_id, request.username, request.email)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(profile))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me/favorites",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorite stations", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_favorites(
    State(state): State<UserAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<StationDto>>>, ApiError> {
    let stations = state
        .user_service
        .list_favorites(&user.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        stations.into_iter().map(StationDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/me/favorites/{station_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("station_id" = String, Path, description = "Station ID")),
    responses(
        (status = 201, description = "Station added to favorites"),
        (status = 404, description = "Station not found"),
        (status = 409, description = "Already a favorite")
    )
)]
pub async fn add_favorite(
    State(state): State<UserAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(station_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    state
        .user_service
        .add_favorite(&user.user_id, &station_id)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/me/favorites/{station_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("station_id" = String, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station removed from favorites"),
        (status = 404, description = "Not a favorite")
    )
)]
pub async fn remove_favorite(
    State(state): State<UserAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(station_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .user_service
        .remove_favorite(&user.user_id, &station_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
