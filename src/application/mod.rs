//! Application layer: the scheduling core plus registry/account services

pub mod scheduling;
pub mod services;

pub use scheduling::{
    AvailabilityEngine, AvailabilityReport, CreateReservation, ReservationService,
    UpdateReservation,
};
pub use services::{StationInput, StationService, UserService};
