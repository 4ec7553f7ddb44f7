//! Station aggregate
//!
//! Contains the charging station entity, connector capacity types, and
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{Address, ConnectorCapacity, ConnectorType, Pricing, Station, StationStatus};
pub use repository::{StationFilter, StationRepository};
