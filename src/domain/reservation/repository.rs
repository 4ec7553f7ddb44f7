//! Reservation repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{PaymentInfo, Reservation, ReservationStatus, TimeWindow, VehicleInfo};
use crate::domain::station::ConnectorType;
use crate::domain::DomainResult;

/// Fields updated alongside a status compare-and-set. `None` leaves the
/// stored value untouched.
#[derive(Debug, Default, Clone)]
pub struct ReservationPatch {
    pub window: Option<TimeWindow>,
    pub estimated_cost: Option<f64>,
    pub vehicle_info: Option<VehicleInfo>,
    pub payment_info: Option<PaymentInfo>,
    pub notes: Option<String>,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new reservation
    async fn create(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Find by ID regardless of owner
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Find by ID, scoped to the owning user. A foreign reservation is
    /// indistinguishable from an absent one.
    async fn find_for_user(&self, id: &str, user_id: &str) -> DomainResult<Option<Reservation>>;

    /// All reservations on (station, connector type) holding capacity
    /// (status confirmed or active) whose window overlaps `window` under the
    /// half-open test, excluding `exclude_id` when given.
    ///
    /// Pending reservations are deliberately not counted: a pending booking
    /// is an unconfirmed hold and does not block other bookings.
    async fn find_overlapping(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
        window: &TimeWindow,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Atomically set status (and patch fields) if the current status equals
    /// `expected`. Returns `Ok(None)` when the precondition failed (the
    /// record exists but its status changed under us), `NotFound` when the
    /// record is absent.
    async fn compare_and_set(
        &self,
        id: &str,
        expected: ReservationStatus,
        new: ReservationStatus,
        patch: ReservationPatch,
    ) -> DomainResult<Option<Reservation>>;

    /// Permanently remove a record
    async fn hard_delete(&self, id: &str) -> DomainResult<()>;

    /// User's reservations, newest first, optionally filtered by status
    async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)>;

    /// A station's reservations ordered by start time, optionally filtered
    /// by status and by windows touching a calendar date.
    async fn list_for_station(
        &self,
        station_id: &str,
        status: Option<ReservationStatus>,
        date: Option<NaiveDate>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)>;
}
