//! Reservation aggregate
//!
//! Contains the Reservation entity, related types, and repository interface.

pub mod model;
pub mod repository;

pub use model::{
    PaymentInfo, PaymentMethod, Reservation, ReservationStatus, TimeWindow, VehicleInfo,
};
pub use repository::{ReservationPatch, ReservationRepository};
