//! Reservation lifecycle state machine
//!
//! Owns every status transition and its guards. All writes go through a
//! compare-and-set on the expected current status, so a racing transition
//! loses with `InvalidTransition` instead of clobbering state.
//!
//! Every mutating operation except `confirm` (an operator action) is scoped
//! to the owning user; a foreign reservation is reported as `NotFound`.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::availability::{AvailabilityEngine, AvailabilityReport};
use super::cost::estimate_cost;
use crate::domain::reservation::{
    PaymentInfo, Reservation, ReservationPatch, ReservationStatus, TimeWindow, VehicleInfo,
};
use crate::domain::station::ConnectorType;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Input for creating a reservation
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub station_id: String,
    pub connector_type: ConnectorType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub vehicle_info: Option<VehicleInfo>,
    pub notes: Option<String>,
}

/// Input for updating a reservation. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateReservation {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub vehicle_info: Option<VehicleInfo>,
    pub notes: Option<String>,
}

/// Reservation lifecycle service
pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    engine: Arc<AvailabilityEngine>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, engine: Arc<AvailabilityEngine>) -> Self {
        Self { repos, engine }
    }

    fn not_found(id: &str) -> DomainError {
        DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: id.to_string(),
        }
    }

    /// Resolve a CAS precondition failure into a precise error: the racing
    /// winner's status for `InvalidTransition`, or `NotFound` if the record
    /// vanished.
    async fn lost_race(
        &self,
        id: &str,
        action: &'static str,
        required: &'static str,
    ) -> DomainError {
        match self.repos.reservations().find_by_id(id).await {
            Ok(Some(r)) => DomainError::InvalidTransition {
                action,
                from: r.status,
                required,
            },
            Ok(None) => Self::not_found(id),
            Err(e) => e,
        }
    }

    async fn owned(&self, user_id: &str, id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_for_user(id, user_id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Create a new reservation in `pending` status.
    ///
    /// Admission counts only capacity-holding ({confirmed, active})
    /// reservations, so pending holds placed by others do not block this
    /// request.
    pub async fn create(
        &self,
        user_id: &str,
        request: CreateReservation,
    ) -> DomainResult<Reservation> {
        let window = TimeWindow::new(request.start_time, request.end_time)?;
        if window.start < Utc::now() {
            return Err(DomainError::InvalidTimeWindow(
                "start time cannot be in the past".to_string(),
            ));
        }

        let (station, capacity) = self
            .engine
            .load_bookable(&request.station_id, request.connector_type)
            .await?;

        let estimated_cost =
            estimate_cost(&station.pricing, &window, request.vehicle_info.as_ref());

        let reservation = Reservation::new(
            user_id,
            &request.station_id,
            request.connector_type,
            window,
            estimated_cost,
            request.vehicle_info,
            request.notes,
        );

        let admitted = self.engine.admit_create(&capacity, reservation).await?;
        info!(
            reservation_id = %admitted.id,
            station_id = %admitted.station_id,
            connector_type = %admitted.connector_type,
            estimated_cost = admitted.estimated_cost,
            "Reservation created"
        );
        Ok(admitted)
    }

    /// Update time window and/or vehicle info on a non-terminal reservation.
    ///
    /// A window change re-runs admission (excluding this reservation) and
    /// recomputes the estimated cost; on rejection the stored reservation is
    /// left untouched.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        request: UpdateReservation,
    ) -> DomainResult<Reservation> {
        let current = self.owned(user_id, id).await?;
        if current.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                action: "update",
                from: current.status,
                required: "pending, confirmed or active",
            });
        }

        let new_window = TimeWindow::new(
            request.start_time.unwrap_or(current.window.start),
            request.end_time.unwrap_or(current.window.end),
        )?;

        if new_window == current.window {
            // No admission needed; patch the remaining fields, if any.
            if request.vehicle_info.is_none() && request.notes.is_none() {
                return Ok(current);
            }
            let patch = ReservationPatch {
                vehicle_info: request.vehicle_info,
                notes: request.notes,
                ..Default::default()
            };
            return match self
                .repos
                .reservations()
                .compare_and_set(id, current.status, current.status, patch)
                .await?
            {
                Some(r) => Ok(r),
                None => Err(self
                    .lost_race(id, "update", "pending, confirmed or active")
                    .await),
            };
        }

        let (station, capacity) = self
            .engine
            .load_bookable(&current.station_id, current.connector_type)
            .await?;

        let effective_vehicle = request
            .vehicle_info
            .clone()
            .or_else(|| current.vehicle_info.clone());
        let estimated_cost =
            estimate_cost(&station.pricing, &new_window, effective_vehicle.as_ref());

        let patch = ReservationPatch {
            window: Some(new_window),
            estimated_cost: Some(estimated_cost),
            vehicle_info: request.vehicle_info,
            notes: request.notes,
            ..Default::default()
        };

        match self
            .engine
            .admit_write(
                &capacity,
                &current.station_id,
                id,
                &new_window,
                current.status,
                current.status,
                patch,
            )
            .await?
        {
            Some(updated) => {
                info!(
                    reservation_id = %updated.id,
                    window = %updated.window,
                    estimated_cost = updated.estimated_cost,
                    "Reservation rescheduled"
                );
                Ok(updated)
            }
            None => Err(self
                .lost_race(id, "update", "pending, confirmed or active")
                .await),
        }
    }

    /// Confirm a pending reservation (operator/system action).
    ///
    /// Confirmation is where a pending hold starts counting against
    /// connector capacity, so admission is re-checked here: of several
    /// pending holds racing for the last unit, exactly one confirm wins.
    pub async fn confirm(&self, id: &str) -> DomainResult<Reservation> {
        let current = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        if current.status != ReservationStatus::Pending {
            return Err(DomainError::InvalidTransition {
                action: "confirm",
                from: current.status,
                required: "pending",
            });
        }

        let (_, capacity) = self
            .engine
            .load_bookable(&current.station_id, current.connector_type)
            .await?;

        match self
            .engine
            .admit_write(
                &capacity,
                &current.station_id,
                id,
                &current.window,
                ReservationStatus::Pending,
                ReservationStatus::Confirmed,
                ReservationPatch::default(),
            )
            .await?
        {
            Some(confirmed) => {
                info!(reservation_id = %confirmed.id, "Reservation confirmed");
                Ok(confirmed)
            }
            None => Err(self.lost_race(id, "confirm", "pending").await),
        }
    }

    /// Start the charging session (confirmed → active).
    ///
    /// Expiry is evaluated lazily here: a confirmed reservation whose window
    /// has passed is rejected rather than activated.
    pub async fn start(&self, user_id: &str, id: &str) -> DomainResult<Reservation> {
        let current = self.owned(user_id, id).await?;
        if current.status != ReservationStatus::Confirmed {
            return Err(DomainError::InvalidTransition {
                action: "start",
                from: current.status,
                required: "confirmed",
            });
        }

        let now = Utc::now();
        if now < current.window.start {
            return Err(DomainError::NotYetStarted {
                starts_at: current.window.start,
            });
        }
        if now > current.window.end {
            return Err(DomainError::Expired {
                ended_at: current.window.end,
            });
        }

        match self
            .repos
            .reservations()
            .compare_and_set(
                id,
                ReservationStatus::Confirmed,
                ReservationStatus::Active,
                ReservationPatch::default(),
            )
            .await?
        {
            Some(active) => {
                info!(reservation_id = %active.id, "Charging session started");
                Ok(active)
            }
            None => Err(self.lost_race(id, "start", "confirmed").await),
        }
    }

    /// Complete the charging session (active → completed). An actual cost
    /// overwrites the estimate; payment info is attached when supplied.
    pub async fn complete(
        &self,
        user_id: &str,
        id: &str,
        actual_cost: Option<f64>,
        payment_info: Option<PaymentInfo>,
    ) -> DomainResult<Reservation> {
        if let Some(cost) = actual_cost {
            if cost < 0.0 {
                return Err(DomainError::Validation(
                    "actual cost cannot be negative".to_string(),
                ));
            }
        }

        let current = self.owned(user_id, id).await?;
        if current.status != ReservationStatus::Active {
            return Err(DomainError::InvalidTransition {
                action: "complete",
                from: current.status,
                required: "active",
            });
        }

        let patch = ReservationPatch {
            estimated_cost: actual_cost,
            payment_info,
            ..Default::default()
        };
        match self
            .repos
            .reservations()
            .compare_and_set(
                id,
                ReservationStatus::Active,
                ReservationStatus::Completed,
                patch,
            )
            .await?
        {
            Some(completed) => {
                info!(
                    reservation_id = %completed.id,
                    cost = completed.estimated_cost,
                    "Charging session completed"
                );
                Ok(completed)
            }
            None => Err(self.lost_race(id, "complete", "active").await),
        }
    }

    /// Cancel a non-terminal reservation.
    pub async fn cancel(&self, user_id: &str, id: &str) -> DomainResult<Reservation> {
        let current = self.owned(user_id, id).await?;
        if current.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                action: "cancel",
                from: current.status,
                required: "pending, confirmed or active",
            });
        }

        match self
            .repos
            .reservations()
            .compare_and_set(
                id,
                current.status,
                ReservationStatus::Cancelled,
                ReservationPatch::default(),
            )
            .await?
        {
            Some(cancelled) => {
                info!(reservation_id = %cancelled.id, "Reservation cancelled");
                Ok(cancelled)
            }
            None => Err(self
                .lost_race(id, "cancel", "pending, confirmed or active")
                .await),
        }
    }

    /// Permanently delete a terminal reservation at the owner's request.
    pub async fn delete(&self, user_id: &str, id: &str) -> DomainResult<()> {
        let current = self.owned(user_id, id).await?;
        if !current.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                action: "delete",
                from: current.status,
                required: "completed or cancelled",
            });
        }
        self.repos.reservations().hard_delete(id).await?;
        info!(reservation_id = %id, "Reservation permanently deleted");
        Ok(())
    }

    /// Advisory availability report; see [`AvailabilityEngine::check_availability`].
    pub async fn check_availability(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> DomainResult<AvailabilityReport> {
        let window = TimeWindow::new(start_time, end_time)?;
        self.engine
            .check_availability(station_id, connector_type, &window, None)
            .await
    }

    pub async fn get(&self, user_id: &str, id: &str) -> DomainResult<Reservation> {
        self.owned(user_id, id).await
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)> {
        self.repos
            .reservations()
            .list_for_user(user_id, status, page, limit)
            .await
    }

    pub async fn list_for_station(
        &self,
        station_id: &str,
        status: Option<ReservationStatus>,
        date: Option<NaiveDate>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)> {
        self.repos
            .reservations()
            .list_for_station(station_id, status, date, page, limit)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::reservation::PaymentMethod;
    use crate::domain::station::{
        Address, ConnectorCapacity, Pricing, Station, StationStatus,
    };
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;

    const OWNER: &str = "u-owner";

    fn station(ccs_count: u32) -> Station {
        Station {
            id: "st-1".into(),
            name: "Test Station".into(),
            address: Address::default(),
            latitude: 0.0,
            longitude: 0.0,
            connectors: vec![ConnectorCapacity {
                connector_type: ConnectorType::Ccs,
                power_kw: 150.0,
                count: ccs_count,
                available: ccs_count,
            }],
            pricing: Pricing {
                per_kwh: Some(0.30),
                per_minute: Some(0.10),
                session_fee: None,
                currency: "USD".into(),
            },
            status: StationStatus::Active,
            total_ports: ccs_count,
            available_ports: ccs_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn service(ccs_count: u32) -> (Arc<InMemoryRepositoryProvider>, ReservationService) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.stations().save(station(ccs_count)).await.unwrap();
        let engine = Arc::new(AvailabilityEngine::new(
            repos.clone() as Arc<dyn RepositoryProvider>
        ));
        let svc = ReservationService::new(repos.clone(), engine);
        (repos, svc)
    }

    fn future_request(start_offset_h: i64, end_offset_h: i64) -> CreateReservation {
        CreateReservation {
            station_id: "st-1".into(),
            connector_type: ConnectorType::Ccs,
            start_time: Utc::now() + Duration::hours(start_offset_h),
            end_time: Utc::now() + Duration::hours(end_offset_h),
            vehicle_info: Some(VehicleInfo {
                make: Some("Nissan".into()),
                model: Some("Leaf".into()),
                battery_capacity_kwh: Some(60.0),
                current_charge_percent: Some(30),
            }),
            notes: None,
        }
    }

    /// A request whose window has already begun, inserted directly so the
    /// create-time "start in the past" rule does not apply.
    async fn running_reservation(
        repos: &InMemoryRepositoryProvider,
        status: ReservationStatus,
    ) -> Reservation {
        let window = TimeWindow::new(
            Utc::now() - Duration::minutes(10),
            Utc::now() + Duration::hours(1),
        )
        .unwrap();
        let mut r = Reservation::new(OWNER, "st-1", ConnectorType::Ccs, window, 5.0, None, None);
        r.status = status;
        repos.reservations().create(r.clone()).await.unwrap();
        r
    }

    #[tokio::test]
    async fn create_yields_pending_with_estimated_cost() {
        let (_, svc) = service(1).await;
        let r = svc.create(OWNER, future_request(1, 2)).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);
        // 60 kWh * 0.8 * 0.30 = 14.4
        assert!((r.estimated_cost - 14.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn create_rejects_past_start() {
        let (_, svc) = service(1).await;
        let err = svc.create(OWNER, future_request(-1, 2)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeWindow(_)));
    }

    #[tokio::test]
    async fn create_rejects_inverted_window() {
        let (_, svc) = service(1).await;
        let err = svc.create(OWNER, future_request(2, 1)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeWindow(_)));
    }

    #[tokio::test]
    async fn full_lifecycle_roundtrip() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Pending).await;

        let r = svc.confirm(&r.id).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);

        let r = svc.start(OWNER, &r.id).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Active);

        let r = svc
            .complete(
                OWNER,
                &r.id,
                Some(12.5),
                Some(PaymentInfo {
                    method: PaymentMethod::CreditCard,
                    transaction_id: Some("tx-99".into()),
                }),
            )
            .await
            .unwrap();
        assert_eq!(r.status, ReservationStatus::Completed);
        assert_eq!(r.estimated_cost, 12.5);
        assert_eq!(
            r.payment_info.as_ref().unwrap().method,
            PaymentMethod::CreditCard
        );
    }

    #[tokio::test]
    async fn complete_without_actual_cost_keeps_estimate() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Active).await;
        let done = svc.complete(OWNER, &r.id, None, None).await.unwrap();
        assert_eq!(done.estimated_cost, r.estimated_cost);
        assert!(done.payment_info.is_none());
    }

    #[tokio::test]
    async fn start_before_window_is_not_yet_started() {
        let (_, svc) = service(1).await;
        let r = svc.create(OWNER, future_request(1, 2)).await.unwrap();
        svc.confirm(&r.id).await.unwrap();
        let err = svc.start(OWNER, &r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotYetStarted { .. }));
    }

    #[tokio::test]
    async fn start_after_window_is_expired() {
        let (repos, svc) = service(1).await;
        let window = TimeWindow::new(
            Utc::now() - Duration::hours(2),
            Utc::now() - Duration::hours(1),
        )
        .unwrap();
        let mut r = Reservation::new(OWNER, "st-1", ConnectorType::Ccs, window, 5.0, None, None);
        r.status = ReservationStatus::Confirmed;
        repos.reservations().create(r.clone()).await.unwrap();

        let err = svc.start(OWNER, &r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Expired { .. }));
    }

    #[tokio::test]
    async fn start_twice_is_invalid_transition() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Confirmed).await;
        svc.start(OWNER, &r.id).await.unwrap();
        let err = svc.start(OWNER, &r.id).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                from: ReservationStatus::Active,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn confirm_requires_pending() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Active).await;
        let err = svc.confirm(&r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn confirm_rechecks_capacity() {
        // two pending holds on the last unit: only the first confirm wins
        let (repos, svc) = service(1).await;
        let a = running_reservation(&repos, ReservationStatus::Pending).await;
        let b = {
            let window = TimeWindow::new(
                Utc::now() - Duration::minutes(5),
                Utc::now() + Duration::minutes(50),
            )
            .unwrap();
            let mut r =
                Reservation::new(OWNER, "st-1", ConnectorType::Ccs, window, 5.0, None, None);
            r.status = ReservationStatus::Pending;
            repos.reservations().create(r.clone()).await.unwrap();
            r
        };

        svc.confirm(&a.id).await.unwrap();
        let err = svc.confirm(&b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NoAvailableConnector { .. }));
    }

    #[tokio::test]
    async fn cancel_from_each_nonterminal_status() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Active,
        ] {
            let (repos, svc) = service(1).await;
            let r = running_reservation(&repos, status).await;
            let cancelled = svc.cancel(OWNER, &r.id).await.unwrap();
            assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        }
    }

    #[tokio::test]
    async fn cancel_terminal_is_invalid_transition() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Completed).await;
        let err = svc.cancel(OWNER, &r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn hard_delete_requires_terminal_status() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Pending).await;
        let err = svc.delete(OWNER, &r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        svc.cancel(OWNER, &r.id).await.unwrap();
        svc.delete(OWNER, &r.id).await.unwrap();
        assert!(repos
            .reservations()
            .find_by_id(&r.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn foreign_reservation_reads_as_not_found() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Pending).await;
        let err = svc.cancel("someone-else", &r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        let err = svc.get("someone-else", &r.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_window_recomputes_cost_and_rechecks_admission() {
        let (_, svc) = service(1).await;
        let r = svc.create(OWNER, future_request(1, 2)).await.unwrap();

        let updated = svc
            .update(
                OWNER,
                &r.id,
                UpdateReservation {
                    end_time: Some(r.window.end + Duration::hours(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.window.end, r.window.end + Duration::hours(1));
        // per-kWh estimate is duration-independent here
        assert!((updated.estimated_cost - 14.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn update_with_unchanged_window_keeps_cost() {
        let (_, svc) = service(1).await;
        let r = svc.create(OWNER, future_request(1, 2)).await.unwrap();

        let updated = svc
            .update(
                OWNER,
                &r.id,
                UpdateReservation {
                    start_time: Some(r.window.start),
                    end_time: Some(r.window.end),
                    notes: Some("gate code 4711".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.estimated_cost, r.estimated_cost);
        assert_eq!(updated.notes.as_deref(), Some("gate code 4711"));
    }

    #[tokio::test]
    async fn update_rejected_by_admission_leaves_reservation_unchanged() {
        let (repos, svc) = service(1).await;
        // a confirmed reservation occupies 14:00–16:00 (relative to now)
        let blocker_window = TimeWindow::new(
            Utc::now() + Duration::hours(14),
            Utc::now() + Duration::hours(16),
        )
        .unwrap();
        let mut blocker = Reservation::new(
            "u-other",
            "st-1",
            ConnectorType::Ccs,
            blocker_window,
            5.0,
            None,
            None,
        );
        blocker.status = ReservationStatus::Confirmed;
        repos.reservations().create(blocker).await.unwrap();

        let r = svc.create(OWNER, future_request(1, 2)).await.unwrap();
        let err = svc
            .update(
                OWNER,
                &r.id,
                UpdateReservation {
                    start_time: Some(Utc::now() + Duration::hours(14)),
                    end_time: Some(Utc::now() + Duration::hours(15)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NoAvailableConnector { .. }));

        let stored = svc.get(OWNER, &r.id).await.unwrap();
        assert_eq!(stored.window, r.window);
        assert_eq!(stored.estimated_cost, r.estimated_cost);
    }

    #[tokio::test]
    async fn update_terminal_reservation_is_rejected() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Cancelled).await;
        let err = svc
            .update(OWNER, &r.id, UpdateReservation::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn complete_rejects_negative_actual_cost() {
        let (repos, svc) = service(1).await;
        let r = running_reservation(&repos, ReservationStatus::Active).await;
        let err = svc
            .complete(OWNER, &r.id, Some(-1.0), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn list_for_user_filters_by_status() {
        let (repos, svc) = service(3).await;
        running_reservation(&repos, ReservationStatus::Pending).await;
        running_reservation(&repos, ReservationStatus::Completed).await;

        let (all, total) = svc.list_for_user(OWNER, None, 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);

        let (done, total) = svc
            .list_for_user(OWNER, Some(ReservationStatus::Completed), 1, 10)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(done[0].status, ReservationStatus::Completed);
    }
}
