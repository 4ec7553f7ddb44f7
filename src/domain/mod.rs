pub mod error;
pub mod repositories;
pub mod reservation;
pub mod station;
pub mod user;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use reservation::{
    PaymentInfo, PaymentMethod, Reservation, ReservationPatch, ReservationStatus, TimeWindow,
    VehicleInfo,
};
pub use station::{
    Address, ConnectorCapacity, ConnectorType, Pricing, Station, StationFilter, StationStatus,
};
pub use user::{User, UserRole};
