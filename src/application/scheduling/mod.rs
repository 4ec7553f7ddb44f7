//! Reservation scheduling core
//!
//! - `availability`: admission control over connector capacity
//! - `lifecycle`: the reservation state machine
//! - `cost`: session cost estimation

pub mod availability;
pub mod cost;
pub mod lifecycle;

pub use availability::{AvailabilityEngine, AvailabilityReport};
pub use cost::estimate_cost;
pub use lifecycle::{CreateReservation, ReservationService, UpdateReservation};
