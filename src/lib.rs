//! # ChargeFinder
//!
//! Backend for locating EV charging stations and booking time-slotted
//! charging sessions on physical connectors.
//!
//! ## Architecture
//!
//! - **domain**: entities, repository traits and the error taxonomy
//! - **application**: the scheduling core (admission control, reservation
//!   lifecycle, cost estimation) plus registry/account services
//! - **infrastructure**: SeaORM persistence, migrations, in-memory storage
//! - **interfaces**: REST API with Swagger documentation
//! - **auth**: JWT authentication and password hashing
//!
//! The one invariant the whole system exists to protect: for any station and
//! connector type, overlapping reservations in a capacity-holding status
//! never exceed the number of physical connector units.

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
