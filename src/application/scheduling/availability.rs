//! Connector availability and admission control
//!
//! Decides whether a reservation may claim a connector unit for a time
//! window, and performs the claim atomically with respect to concurrent
//! requests on the same (station, connector type) slot.
//!
//! Capacity is never read from the station's cached `available` counters:
//! every decision recounts live overlapping reservations in a
//! capacity-holding status ({confirmed, active}).

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::reservation::{Reservation, ReservationPatch, ReservationStatus, TimeWindow};
use crate::domain::station::{ConnectorCapacity, ConnectorType, Station};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Advisory availability report for one (station, connector type, window).
///
/// Produced without holding the slot lock: the answer can be stale by the
/// time a booking follows it. Admission always re-checks.
#[derive(Debug)]
pub struct AvailabilityReport {
    pub is_available: bool,
    pub total_connectors: u32,
    pub available_connectors: u32,
    pub reserved_connectors: u32,
    pub conflicting: Vec<Reservation>,
}

type SlotKey = (String, ConnectorType);

/// Admission-control engine for connector capacity.
pub struct AvailabilityEngine {
    repos: Arc<dyn RepositoryProvider>,
    /// One async mutex per (station, connector type). Admission check and
    /// the following write happen under this lock; distinct slots proceed
    /// in parallel.
    slot_locks: DashMap<SlotKey, Arc<Mutex<()>>>,
}

impl AvailabilityEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            slot_locks: DashMap::new(),
        }
    }

    fn slot_lock(&self, station_id: &str, connector_type: ConnectorType) -> Arc<Mutex<()>> {
        self.slot_locks
            .entry((station_id.to_string(), connector_type))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Load a station that admits bookings, plus its capacity entry for the
    /// requested connector type.
    pub async fn load_bookable(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
    ) -> DomainResult<(Station, ConnectorCapacity)> {
        let station = self
            .repos
            .stations()
            .find_by_id(station_id)
            .await?
            .filter(Station::is_bookable)
            .ok_or_else(|| DomainError::StationUnavailable(station_id.to_string()))?;

        let capacity = self
            .repos
            .stations()
            .get_connector_capacity(station_id, connector_type)
            .await?
            .ok_or_else(|| DomainError::ConnectorTypeNotSupported {
                station_id: station_id.to_string(),
                connector_type,
            })?;

        Ok((station, capacity))
    }

    /// Count capacity-holding reservations overlapping `window`; reject when
    /// the slot is full. Callers must hold the slot lock when the result
    /// gates a write.
    async fn ensure_capacity(
        &self,
        station_id: &str,
        capacity: &ConnectorCapacity,
        window: &TimeWindow,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        let conflicts = self
            .repos
            .reservations()
            .find_overlapping(station_id, capacity.connector_type, window, exclude_id)
            .await?;

        if conflicts.len() as u32 >= capacity.count {
            debug!(
                station_id,
                connector_type = %capacity.connector_type,
                conflicts = conflicts.len(),
                capacity = capacity.count,
                "admission rejected: slot full"
            );
            return Err(DomainError::NoAvailableConnector {
                connector_type: capacity.connector_type,
                conflicts: conflicts.iter().map(|r| r.window).collect(),
            });
        }
        Ok(())
    }

    /// Read-only availability check. Advisory only: no lock is taken, and a
    /// concurrent booking can invalidate the answer immediately.
    pub async fn check_availability(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
        window: &TimeWindow,
        exclude_id: Option<&str>,
    ) -> DomainResult<AvailabilityReport> {
        let (_, capacity) = self.load_bookable(station_id, connector_type).await?;

        let conflicting = self
            .repos
            .reservations()
            .find_overlapping(station_id, connector_type, window, exclude_id)
            .await?;

        let reserved = conflicting.len() as u32;
        Ok(AvailabilityReport {
            is_available: reserved < capacity.count,
            total_connectors: capacity.count,
            available_connectors: capacity.count.saturating_sub(reserved),
            reserved_connectors: reserved,
            conflicting,
        })
    }

    /// Admit and persist a brand-new reservation.
    ///
    /// The overlap count and the insert run under the slot lock, so two
    /// concurrent requests for the last free unit cannot both pass.
    pub async fn admit_create(
        &self,
        capacity: &ConnectorCapacity,
        reservation: Reservation,
    ) -> DomainResult<Reservation> {
        let lock = self.slot_lock(&reservation.station_id, reservation.connector_type);
        let _guard = lock.lock().await;

        self.ensure_capacity(&reservation.station_id, capacity, &reservation.window, None)
            .await?;
        self.repos.reservations().create(reservation).await
    }

    /// Admit a write that (re)claims capacity for `window` (a status change
    /// into a capacity-holding state, or a time-window change) and apply it
    /// with a compare-and-set on the expected status.
    ///
    /// Returns `Ok(None)` when the status precondition failed (a concurrent
    /// transition won); the reservation is left unchanged on any failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn admit_write(
        &self,
        capacity: &ConnectorCapacity,
        station_id: &str,
        reservation_id: &str,
        window: &TimeWindow,
        expected: ReservationStatus,
        new: ReservationStatus,
        patch: ReservationPatch,
    ) -> DomainResult<Option<Reservation>> {
        let lock = self.slot_lock(station_id, capacity.connector_type);
        let _guard = lock.lock().await;

        self.ensure_capacity(station_id, capacity, window, Some(reservation_id))
            .await?;
        self.repos
            .reservations()
            .compare_and_set(reservation_id, expected, new, patch)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::station::{Address, Pricing, StationStatus};
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;

    fn window(start_h: u32, end_h: u32) -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2030, 5, 10, start_h, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2030, 5, 10, end_h, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn station(id: &str, ccs_count: u32) -> Station {
        Station {
            id: id.into(),
            name: format!("Station {id}"),
            address: Address {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip_code: "62701".into(),
                country: "USA".into(),
            },
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
                per_minute: None,
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

    fn reservation(station_id: &str, w: TimeWindow, status: ReservationStatus) -> Reservation {
        let mut r = Reservation::new("u-1", station_id, ConnectorType::Ccs, w, 10.0, None, None);
        r.status = status;
        r
    }

    async fn setup(ccs_count: u32) -> (Arc<InMemoryRepositoryProvider>, AvailabilityEngine) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.stations().save(station("st-1", ccs_count)).await.unwrap();
        let engine = AvailabilityEngine::new(repos.clone());
        (repos, engine)
    }

    #[tokio::test]
    async fn admits_when_slot_is_free() {
        let (_, engine) = setup(1).await;
        let (_, capacity) = engine.load_bookable("st-1", ConnectorType::Ccs).await.unwrap();

        let admitted = engine
            .admit_create(
                &capacity,
                reservation("st-1", window(10, 11), ReservationStatus::Pending),
            )
            .await
            .unwrap();
        assert_eq!(admitted.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn rejects_when_confirmed_overlap_fills_capacity() {
        let (repos, engine) = setup(1).await;
        repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Confirmed))
            .await
            .unwrap();

        let (_, capacity) = engine.load_bookable("st-1", ConnectorType::Ccs).await.unwrap();
        let err = engine
            .admit_create(
                &capacity,
                reservation("st-1", window(10, 12), ReservationStatus::Pending),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NoAvailableConnector { .. }));
    }

    #[tokio::test]
    async fn pending_reservations_do_not_block_admission() {
        let (repos, engine) = setup(1).await;
        repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Pending))
            .await
            .unwrap();

        let (_, capacity) = engine.load_bookable("st-1", ConnectorType::Ccs).await.unwrap();
        assert!(engine
            .admit_create(
                &capacity,
                reservation("st-1", window(10, 11), ReservationStatus::Pending),
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn touching_windows_are_admitted() {
        let (repos, engine) = setup(1).await;
        repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Confirmed))
            .await
            .unwrap();

        let (_, capacity) = engine.load_bookable("st-1", ConnectorType::Ccs).await.unwrap();
        assert!(engine
            .admit_create(
                &capacity,
                reservation("st-1", window(11, 12), ReservationStatus::Pending),
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn inactive_station_is_unavailable() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let mut s = station("st-1", 1);
        s.status = StationStatus::Maintenance;
        repos.stations().save(s).await.unwrap();
        let engine = AvailabilityEngine::new(repos);

        let err = engine
            .load_bookable("st-1", ConnectorType::Ccs)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StationUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_station_is_unavailable() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let engine = AvailabilityEngine::new(repos);
        let err = engine
            .load_bookable("nope", ConnectorType::Ccs)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StationUnavailable(_)));
    }

    #[tokio::test]
    async fn unsupported_connector_type_is_rejected() {
        let (_, engine) = setup(1).await;
        let err = engine
            .load_bookable("st-1", ConnectorType::Chademo)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ConnectorTypeNotSupported { .. }));
    }

    #[tokio::test]
    async fn availability_report_counts_conflicts() {
        let (repos, engine) = setup(3).await;
        repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Confirmed))
            .await
            .unwrap();
        repos
            .reservations()
            .create(reservation("st-1", window(10, 12), ReservationStatus::Active))
            .await
            .unwrap();
        // cancelled never counts
        repos
            .reservations()
            .create(reservation("st-1", window(10, 12), ReservationStatus::Cancelled))
            .await
            .unwrap();

        let report = engine
            .check_availability("st-1", ConnectorType::Ccs, &window(10, 11), None)
            .await
            .unwrap();
        assert!(report.is_available);
        assert_eq!(report.total_connectors, 3);
        assert_eq!(report.reserved_connectors, 2);
        assert_eq!(report.available_connectors, 1);
        assert_eq!(report.conflicting.len(), 2);
    }

    #[tokio::test]
    async fn admit_write_excludes_own_reservation() {
        let (repos, engine) = setup(1).await;
        let existing = repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Confirmed))
            .await
            .unwrap();

        // shift the only confirmed reservation to an overlapping window
        let (_, capacity) = engine.load_bookable("st-1", ConnectorType::Ccs).await.unwrap();
        let shifted = window(10, 12);
        let updated = engine
            .admit_write(
                &capacity,
                "st-1",
                &existing.id,
                &shifted,
                ReservationStatus::Confirmed,
                ReservationStatus::Confirmed,
                ReservationPatch {
                    window: Some(shifted),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("status precondition holds");
        assert_eq!(updated.window, shifted);
    }

    #[tokio::test]
    async fn admit_write_reports_lost_status_race() {
        let (repos, engine) = setup(1).await;
        let existing = repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Pending))
            .await
            .unwrap();
        // concurrent cancel won
        repos
            .reservations()
            .compare_and_set(
                &existing.id,
                ReservationStatus::Pending,
                ReservationStatus::Cancelled,
                ReservationPatch::default(),
            )
            .await
            .unwrap();

        let (_, capacity) = engine.load_bookable("st-1", ConnectorType::Ccs).await.unwrap();
        let result = engine
            .admit_write(
                &capacity,
                "st-1",
                &existing.id,
                &window(10, 11),
                ReservationStatus::Pending,
                ReservationStatus::Confirmed,
                ReservationPatch::default(),
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_confirms_admit_exactly_one() {
        let (repos, engine) = setup(1).await;
        let engine = Arc::new(engine);

        let a = repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Pending))
            .await
            .unwrap();
        let b = repos
            .reservations()
            .create(reservation("st-1", window(10, 11), ReservationStatus::Pending))
            .await
            .unwrap();

        let (_, capacity) = engine.load_bookable("st-1", ConnectorType::Ccs).await.unwrap();

        let confirm = |id: String| {
            let engine = engine.clone();
            let capacity = capacity.clone();
            let w = window(10, 11);
            tokio::spawn(async move {
                engine
                    .admit_write(
                        &capacity,
                        "st-1",
                        &id,
                        &w,
                        ReservationStatus::Pending,
                        ReservationStatus::Confirmed,
                        ReservationPatch::default(),
                    )
                    .await
            })
        };

        let (ra, rb) = tokio::join!(confirm(a.id.clone()), confirm(b.id.clone()));
        let results = [ra.unwrap(), rb.unwrap()];

        let admitted = results
            .iter()
            .filter(|r| matches!(r, Ok(Some(_))))
            .count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::NoAvailableConnector { .. })))
            .count();
        assert_eq!(admitted, 1, "exactly one confirm may win the last unit");
        assert_eq!(rejected, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn distinct_slots_admit_concurrently() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.stations().save(station("st-1", 1)).await.unwrap();
        repos.stations().save(station("st-2", 1)).await.unwrap();
        let engine = Arc::new(AvailabilityEngine::new(repos.clone()));

        let book = |station_id: &'static str| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let (_, capacity) = engine
                    .load_bookable(station_id, ConnectorType::Ccs)
                    .await
                    .unwrap();
                engine
                    .admit_create(
                        &capacity,
                        reservation(station_id, window(10, 11), ReservationStatus::Pending),
                    )
                    .await
            })
        };

        let (ra, rb) = tokio::join!(book("st-1"), book("st-2"));
        assert!(ra.unwrap().is_ok());
        assert!(rb.unwrap().is_ok());
    }
}
