//! Station registry business logic

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::station::{
    Address, ConnectorCapacity, Pricing, Station, StationFilter, StationStatus,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Input for creating or replacing a station
#[derive(Debug, Clone)]
pub struct StationInput {
    pub name: String,
    pub address: Address,
    pub latitude: f64,
    pub longitude: f64,
    pub connectors: Vec<ConnectorCapacity>,
    pub pricing: Pricing,
    pub status: StationStatus,
}

/// Service for station registry operations
pub struct StationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    fn validate(input: &StationInput) -> DomainResult<()> {
        if input.connectors.is_empty() {
            return Err(DomainError::Validation(
                "at least one connector type is required".to_string(),
            ));
        }
        for (i, connector) in input.connectors.iter().enumerate() {
            if input.connectors[..i]
                .iter()
                .any(|c| c.connector_type == connector.connector_type)
            {
                return Err(DomainError::Validation(format!(
                    "duplicate connector type: {}",
                    connector.connector_type
                )));
            }
            if connector.available > connector.count {
                return Err(DomainError::Validation(format!(
                    "available units ({}) exceed total count ({}) for {}",
                    connector.available, connector.count, connector.connector_type
                )));
            }
        }
        Ok(())
    }

    pub async fn create(&self, input: StationInput) -> DomainResult<Station> {
        Self::validate(&input)?;

        let now = Utc::now();
        let mut station = Station {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
            connectors: input.connectors,
            pricing: input.pricing,
            status: input.status,
            total_ports: 0,
            available_ports: 0,
            created_at: now,
            updated_at: now,
        };
        station.recompute_port_totals();

        let saved = self.repos.stations().save(station).await?;
        info!(station_id = %saved.id, name = %saved.name, "Station created");
        Ok(saved)
    }

    pub async fn update(&self, id: &str, input: StationInput) -> DomainResult<Station> {
        Self::validate(&input)?;

        let mut station =
            self.repos
                .stations()
                .find_by_id(id)
                .await?
                .ok_or(DomainError::NotFound {
                    entity: "Station",
                    field: "id",
                    value: id.to_string(),
                })?;

        station.name = input.name;
        station.address = input.address;
        station.latitude = input.latitude;
        station.longitude = input.longitude;
        station.connectors = input.connectors;
        station.pricing = input.pricing;
        station.status = input.status;
        station.updated_at = Utc::now();
        station.recompute_port_totals();

        let updated = self.repos.stations().update(station).await?;
        info!(station_id = %updated.id, "Station updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.stations().delete(id).await?;
        info!(station_id = %id, "Station deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> DomainResult<Station> {
        self.repos
            .stations()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn search(
        &self,
        filter: &StationFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Station>, u64)> {
        self.repos.stations().search(filter, page, limit).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
