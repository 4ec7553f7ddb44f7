//! Station repository interface

use async_trait::async_trait;

use super::model::{ConnectorCapacity, ConnectorType, Station, StationStatus};
use crate::domain::DomainResult;

/// Filters for station search. All filters are exact-match and combined
/// with AND; `None` means "any".
#[derive(Debug, Default, Clone)]
pub struct StationFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub connector_type: Option<ConnectorType>,
    pub status: Option<StationStatus>,
}

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Persist a new station (with its connector list)
    async fn save(&self, station: Station) -> DomainResult<Station>;

    /// Replace an existing station and its connector list
    async fn update(&self, station: Station) -> DomainResult<Station>;

    /// Delete a station by ID
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Find station by ID, connectors included
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>>;

    /// Filtered, paginated listing. Returns the page plus the total count.
    async fn search(
        &self,
        filter: &StationFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Station>, u64)>;

    /// Capacity entry for one connector type at a station
    async fn get_connector_capacity(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
    ) -> DomainResult<Option<ConnectorCapacity>>;
}
