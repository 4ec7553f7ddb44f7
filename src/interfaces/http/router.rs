//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::scheduling::ReservationService;
use crate::application::services::{StationService, UserService};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{auth_middleware, AuthState};

use super::common::{ApiResponse, PaginatedResponse, PaginationParams};
use super::modules::{auth, health, metrics, reservations, stations, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::get_current_user,
        // Stations
        stations::list_stations,
        stations::get_station,
        stations::create_station,
        stations::update_station,
        stations::delete_station,
        stations::check_availability,
        stations::list_station_reservations,
        // Reservations
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::get_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        reservations::confirm_reservation,
        reservations::start_charging_session,
        reservations::complete_charging_session,
        reservations::delete_reservation,
        // Users
        users::get_profile,
        users::update_profile,
        users::list_favorites,
        users::add_favorite,
        users::remove_favorite,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<stations::StationDto>,
            PaginatedResponse<reservations::ReservationDto>,
            PaginationParams,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserDto,
            // Stations
            stations::StationRequest,
            stations::StationDto,
            stations::ConnectorCapacityDto,
            stations::PricingDto,
            stations::AddressDto,
            stations::AvailabilityDto,
            stations::ConflictingSlotDto,
            // Reservations
            reservations::CreateReservationRequest,
            reservations::UpdateReservationRequest,
            reservations::CompleteReservationRequest,
            reservations::ReservationDto,
            reservations::VehicleInfoDto,
            reservations::PaymentInfoDto,
            // Users
            users::UpdateProfileRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Authentication", description = "Account registration and JWT login"),
        (name = "Stations", description = "Charging station search, registry and availability"),
        (name = "Reservations", description = "Connector booking and session lifecycle"),
        (name = "Users", description = "Profile and favorite stations"),
    ),
    info(
        title = "ChargeFinder API",
        version = "1.0.0",
        description = "REST API for locating EV charging stations and booking charging sessions",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    station_service: Arc<StationService>,
    reservation_service: Arc<ReservationService>,
    user_service: Arc<UserService>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
    };
    let auth_layer = middleware::from_fn_with_state(auth_state, auth_middleware);

    // ── Stations ───────────────────────────────────────────────
    let station_state = stations::StationAppState {
        station_service,
        reservation_service: reservation_service.clone(),
    };
    let stations_public = Router::new()
        .route("/", get(stations::list_stations))
        .route("/{id}", get(stations::get_station))
        .route("/{id}/availability", get(stations::check_availability))
        .with_state(station_state.clone());
    let stations_protected = Router::new()
        .route("/", post(stations::create_station))
        .route(
            "/{id}",
            put(stations::update_station).delete(stations::delete_station),
        )
        .route("/{id}/reservations", get(stations::list_station_reservations))
        .layer(auth_layer.clone())
        .with_state(station_state);

    // ── Reservations (all protected) ───────────────────────────
    let reservation_state = reservations::ReservationAppState {
        reservation_service,
    };
    let reservation_routes = Router::new()
        .route(
            "/",
            post(reservations::create_reservation).get(reservations::list_my_reservations),
        )
        .route(
            "/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::cancel_reservation),
        )
        .route("/{id}/confirm", post(reservations::confirm_reservation))
        .route("/{id}/start", post(reservations::start_charging_session))
        .route(
            "/{id}/complete",
            post(reservations::complete_charging_session),
        )
        .route("/{id}/permanent", delete(reservations::delete_reservation))
        .layer(auth_layer.clone())
        .with_state(reservation_state);

    // ── Auth ───────────────────────────────────────────────────
    let auth_handler_state = auth::AuthHandlerState {
        user_service: user_service.clone(),
        jwt_config,
    };
    let auth_public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth_handler_state.clone());
    let auth_protected = Router::new()
        .route("/me", get(auth::get_current_user))
        .layer(auth_layer.clone())
        .with_state(auth_handler_state);

    // ── Users (all protected) ──────────────────────────────────
    let user_state = users::UserAppState { user_service };
    let user_routes = Router::new()
        .route("/me", get(users::get_profile).put(users::update_profile))
        .route("/me/favorites", get(users::list_favorites))
        .route(
            "/me/favorites/{station_id}",
            post(users::add_favorite).delete(users::remove_favorite),
        )
        .layer(auth_layer)
        .with_state(user_state);

    // ── Observability ──────────────────────────────────────────
    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let metrics_state = metrics::MetricsState {
        handle: prometheus_handle,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route(
            "/health",
            get(health::health_check).with_state(health_state),
        )
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics_state),
        )
        .nest("/api/v1/auth", auth_public.merge(auth_protected))
        .nest("/api/v1/stations", stations_public.merge(stations_protected))
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/users", user_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
