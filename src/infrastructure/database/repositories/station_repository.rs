//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::domain::station::{
    Address, ConnectorCapacity, ConnectorType, Pricing, Station, StationFilter, StationRepository,
    StationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{connector, favorite, reservation, station};

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn connector_to_domain(m: connector::Model) -> DomainResult<ConnectorCapacity> {
    Ok(ConnectorCapacity {
        connector_type: ConnectorType::parse(&m.connector_type)?,
        power_kw: m.power_kw,
        count: m.count.max(0) as u32,
        available: m.available.max(0) as u32,
    })
}

fn model_to_domain(
    m: station::Model,
    connectors: Vec<connector::Model>,
) -> DomainResult<Station> {
    Ok(Station {
        id: m.id,
        name: m.name,
        address: Address {
            street: m.street,
            city: m.city,
            state: m.state,
            zip_code: m.zip_code,
            country: m.country,
        },
        latitude: m.latitude,
        longitude: m.longitude,
        connectors: connectors
            .into_iter()
            .map(connector_to_domain)
            .collect::<DomainResult<Vec<_>>>()?,
        pricing: Pricing {
            per_kwh: m.per_kwh,
            per_minute: m.per_minute,
            session_fee: m.session_fee,
            currency: m.currency,
        },
        status: StationStatus::from_str(&m.status),
        total_ports: m.total_ports.max(0) as u32,
        available_ports: m.available_ports.max(0) as u32,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn station_active_model(s: &Station) -> station::ActiveModel {
    station::ActiveModel {
        id: Set(s.id.clone()),
        name: Set(s.name.clone()),
        street: Set(s.address.street.clone()),
        city: Set(s.address.city.clone()),
        state: Set(s.address.state.clone()),
        zip_code: Set(s.address.zip_code.clone()),
        country: Set(s.address.country.clone()),
        latitude: Set(s.latitude),
        longitude: Set(s.longitude),
        per_kwh: Set(s.pricing.per_kwh),
        per_minute: Set(s.pricing.per_minute),
        session_fee: Set(s.pricing.session_fee),
        currency: Set(s.pricing.currency.clone()),
        status: Set(s.status.as_str().to_string()),
        total_ports: Set(s.total_ports as i32),
        available_ports: Set(s.available_ports as i32),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

fn connector_active_models(s: &Station) -> Vec<connector::ActiveModel> {
    s.connectors
        .iter()
        .map(|c| connector::ActiveModel {
            id: NotSet,
            station_id: Set(s.id.clone()),
            connector_type: Set(c.connector_type.as_str().to_string()),
            power_kw: Set(c.power_kw),
            count: Set(c.count as i32),
            available: Set(c.available as i32),
        })
        .collect()
}

// ── StationRepository impl ──────────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn save(&self, station: Station) -> DomainResult<Station> {
        debug!("Saving station: {}", station.id);

        let txn = self.db.begin().await?;
        station_active_model(&station).insert(&txn).await?;
        connector::Entity::insert_many(connector_active_models(&station))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(station)
    }

    async fn update(&self, mut station: Station) -> DomainResult<Station> {
        debug!("Updating station: {}", station.id);

        let existing = station::Entity::find_by_id(&station.id).one(&self.db).await?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station.id.clone(),
            });
        }

        station.updated_at = Utc::now();

        // Replace the connector list wholesale; the derived port totals were
        // recomputed by the caller before the write.
        let txn = self.db.begin().await?;
        station_active_model(&station).update(&txn).await?;
        connector::Entity::delete_many()
            .filter(connector::Column::StationId.eq(&station.id))
            .exec(&txn)
            .await?;
        connector::Entity::insert_many(connector_active_models(&station))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(station)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let existing = station::Entity::find_by_id(id).one(&self.db).await?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: id.to_string(),
            });
        }

        let txn = self.db.begin().await?;
        reservation::Entity::delete_many()
            .filter(reservation::Column::StationId.eq(id))
            .exec(&txn)
            .await?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::StationId.eq(id))
            .exec(&txn)
            .await?;
        connector::Entity::delete_many()
            .filter(connector::Column::StationId.eq(id))
            .exec(&txn)
            .await?;
        station::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>> {
        let Some(model) = station::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let connectors = connector::Entity::find()
            .filter(connector::Column::StationId.eq(id))
            .order_by_asc(connector::Column::Id)
            .all(&self.db)
            .await?;
        Ok(Some(model_to_domain(model, connectors)?))
    }

    async fn search(
        &self,
        filter: &StationFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Station>, u64)> {
        let mut query = station::Entity::find();

        if let Some(city) = &filter.city {
            query = query.filter(station::Column::City.eq(city));
        }
        if let Some(state) = &filter.state {
            query = query.filter(station::Column::State.eq(state));
        }
        if let Some(status) = filter.status {
            query = query.filter(station::Column::Status.eq(status.as_str()));
        }
        if let Some(connector_type) = filter.connector_type {
            // (station_id, connector_type) is unique, so the join cannot
            // duplicate stations
            query = query
                .join(JoinType::InnerJoin, station::Relation::Connectors.def())
                .filter(connector::Column::ConnectorType.eq(connector_type.as_str()));
        }

        let paginator = query
            .order_by_asc(station::Column::Name)
            .paginate(&self.db, limit.max(1) as u64);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.max(1) as u64 - 1).await?;

        let connectors = models.load_many(connector::Entity, &self.db).await?;
        let stations = models
            .into_iter()
            .zip(connectors)
            .map(|(m, cs)| model_to_domain(m, cs))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok((stations, total))
    }

    async fn get_connector_capacity(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
    ) -> DomainResult<Option<ConnectorCapacity>> {
        let model = connector::Entity::find()
            .filter(connector::Column::StationId.eq(station_id))
            .filter(connector::Column::ConnectorType.eq(connector_type.as_str()))
            .one(&self.db)
            .await?;
        model.map(connector_to_domain).transpose()
    }
}
