//! Application services

pub mod station;
pub mod user;

pub use station::{StationInput, StationService};
pub use user::UserService;
