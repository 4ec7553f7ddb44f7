//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::reservation::{
    PaymentInfo, PaymentMethod, Reservation, ReservationPatch, ReservationRepository,
    ReservationStatus, TimeWindow, VehicleInfo,
};
use crate::domain::station::ConnectorType;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

/// Statuses that hold connector capacity; the only ones the overlap query
/// counts. Pending is deliberately absent: an unconfirmed hold does not
/// block other bookings.
const CAPACITY_HOLDING: [&str; 2] = ["confirmed", "active"];

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let vehicle_info = if m.vehicle_make.is_some()
        || m.vehicle_model.is_some()
        || m.battery_capacity_kwh.is_some()
        || m.current_charge_percent.is_some()
    {
        Some(VehicleInfo {
            make: m.vehicle_make,
            model: m.vehicle_model,
            battery_capacity_kwh: m.battery_capacity_kwh,
            current_charge_percent: m.current_charge_percent.map(|p| p.clamp(0, 100) as u8),
        })
    } else {
        None
    };

    let payment_info = match m.payment_method {
        Some(method) => Some(PaymentInfo {
            method: PaymentMethod::parse(&method)?,
            transaction_id: m.payment_transaction_id,
        }),
        None => None,
    };

    Ok(Reservation {
        id: m.id,
        user_id: m.user_id,
        station_id: m.station_id,
        connector_type: ConnectorType::parse(&m.connector_type)?,
        window: TimeWindow {
            start: m.start_time,
            end: m.end_time,
        },
        estimated_cost: m.estimated_cost,
        status: ReservationStatus::from_str(&m.status),
        vehicle_info,
        payment_info,
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "Reservation",
        field: "id",
        value: id.to_string(),
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!("Saving reservation: {}", r.id);

        let (vehicle_make, vehicle_model, battery_capacity_kwh, current_charge_percent) =
            match &r.vehicle_info {
                Some(v) => (
                    v.make.clone(),
                    v.model.clone(),
                    v.battery_capacity_kwh,
                    v.current_charge_percent.map(i32::from),
                ),
                None => (None, None, None, None),
            };

        let model = reservation::ActiveModel {
            id: Set(r.id.clone()),
            user_id: Set(r.user_id.clone()),
            station_id: Set(r.station_id.clone()),
            connector_type: Set(r.connector_type.as_str().to_string()),
            start_time: Set(r.window.start),
            end_time: Set(r.window.end),
            estimated_cost: Set(r.estimated_cost),
            status: Set(r.status.as_str().to_string()),
            vehicle_make: Set(vehicle_make),
            vehicle_model: Set(vehicle_model),
            battery_capacity_kwh: Set(battery_capacity_kwh),
            current_charge_percent: Set(current_charge_percent),
            payment_method: Set(r.payment_info.as_ref().map(|p| p.method.as_str().to_string())),
            payment_transaction_id: Set(r
                .payment_info
                .as_ref()
                .and_then(|p| p.transaction_id.clone())),
            notes: Set(r.notes.clone()),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
        };
        model.insert(&self.db).await?;
        Ok(r)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id).one(&self.db).await?;
        model.map(model_to_domain).transpose()
    }

    async fn find_for_user(&self, id: &str, user_id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .filter(reservation::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        model.map(model_to_domain).transpose()
    }

    async fn find_overlapping(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
        window: &TimeWindow,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find()
            .filter(reservation::Column::StationId.eq(station_id))
            .filter(reservation::Column::ConnectorType.eq(connector_type.as_str()))
            .filter(reservation::Column::Status.is_in(CAPACITY_HOLDING))
            // half-open overlap: start < other.end AND end > other.start
            .filter(reservation::Column::StartTime.lt(window.end))
            .filter(reservation::Column::EndTime.gt(window.start));

        if let Some(exclude) = exclude_id {
            query = query.filter(reservation::Column::Id.ne(exclude));
        }

        let models = query
            .order_by_asc(reservation::Column::StartTime)
            .all(&self.db)
            .await?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn compare_and_set(
        &self,
        id: &str,
        expected: ReservationStatus,
        new: ReservationStatus,
        patch: ReservationPatch,
    ) -> DomainResult<Option<Reservation>> {
        debug!(
            "CAS reservation {}: {} -> {}",
            id,
            expected.as_str(),
            new.as_str()
        );

        let mut update = reservation::Entity::update_many()
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(expected.as_str()))
            .col_expr(reservation::Column::Status, Expr::value(new.as_str()))
            .col_expr(reservation::Column::UpdatedAt, Expr::value(Utc::now()));

        if let Some(window) = patch.window {
            update = update
                .col_expr(reservation::Column::StartTime, Expr::value(window.start))
                .col_expr(reservation::Column::EndTime, Expr::value(window.end));
        }
        if let Some(cost) = patch.estimated_cost {
            update = update.col_expr(reservation::Column::EstimatedCost, Expr::value(cost));
        }
        if let Some(vehicle) = patch.vehicle_info {
            update = update
                .col_expr(reservation::Column::VehicleMake, Expr::value(vehicle.make))
                .col_expr(reservation::Column::VehicleModel, Expr::value(vehicle.model))
                .col_expr(
                    reservation::Column::BatteryCapacityKwh,
                    Expr::value(vehicle.battery_capacity_kwh),
                )
                .col_expr(
                    reservation::Column::CurrentChargePercent,
                    Expr::value(vehicle.current_charge_percent.map(i32::from)),
                );
        }
        if let Some(payment) = patch.payment_info {
            update = update
                .col_expr(
                    reservation::Column::PaymentMethod,
                    Expr::value(payment.method.as_str()),
                )
                .col_expr(
                    reservation::Column::PaymentTransactionId,
                    Expr::value(payment.transaction_id),
                );
        }
        if let Some(notes) = patch.notes {
            update = update.col_expr(reservation::Column::Notes, Expr::value(notes));
        }

        let result = update.exec(&self.db).await?;
        if result.rows_affected == 0 {
            // Either the record is gone or the status precondition failed.
            return match reservation::Entity::find_by_id(id).one(&self.db).await? {
                Some(_) => Ok(None),
                None => Err(not_found(id)),
            };
        }

        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(Some(model_to_domain(model)?))
    }

    async fn hard_delete(&self, id: &str) -> DomainResult<()> {
        let result = reservation::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)> {
        let mut query = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(reservation::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(reservation::Column::CreatedAt)
            .paginate(&self.db, limit.max(1) as u64);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.max(1) as u64 - 1).await?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn list_for_station(
        &self,
        station_id: &str,
        status: Option<ReservationStatus>,
        date: Option<NaiveDate>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)> {
        let mut query = reservation::Entity::find()
            .filter(reservation::Column::StationId.eq(station_id));
        if let Some(status) = status {
            query = query.filter(reservation::Column::Status.eq(status.as_str()));
        }
        if let Some(date) = date {
            // windows touching the calendar day [00:00, next 00:00)
            let day_start = date.and_time(chrono::NaiveTime::MIN).and_utc();
            let day_end = day_start + chrono::Duration::days(1);
            query = query
                .filter(reservation::Column::StartTime.lt(day_end))
                .filter(reservation::Column::EndTime.gt(day_start));
        }

        let paginator = query
            .order_by_asc(reservation::Column::StartTime)
            .paginate(&self.db, limit.max(1) as u64);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.max(1) as u64 - 1).await?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok((items, total))
    }
}
