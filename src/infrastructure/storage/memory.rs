//! In-memory repository implementations
//!
//! Used by unit tests and local development. Mirrors the semantics of the
//! SeaORM repositories, including the compare-and-set status write.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use std::collections::BTreeSet;

use crate::domain::reservation::{
    Reservation, ReservationPatch, ReservationRepository, ReservationStatus, TimeWindow,
};
use crate::domain::station::{
    ConnectorCapacity, ConnectorType, Station, StationFilter, StationRepository,
};
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let skip = ((page.max(1) - 1) * limit) as usize;
    let slice = items
        .iter()
        .skip(skip)
        .take(limit as usize)
        .cloned()
        .collect();
    (slice, total)
}

// ── Stations ───────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStationRepository {
    stations: DashMap<String, Station>,
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, mut station: Station) -> DomainResult<Station> {
        if self.stations.contains_key(&station.id) {
            return Err(DomainError::Conflict(format!("Station {}", station.id)));
        }
        station.recompute_port_totals();
        self.stations.insert(station.id.clone(), station.clone());
        Ok(station)
    }

    async fn update(&self, mut station: Station) -> DomainResult<Station> {
        if !self.stations.contains_key(&station.id) {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station.id.clone(),
            });
        }
        station.recompute_port_totals();
        station.updated_at = Utc::now();
        self.stations.insert(station.id.clone(), station.clone());
        Ok(station)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.stations.remove(id).ok_or_else(|| DomainError::NotFound {
            entity: "Station",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>> {
        Ok(self.stations.get(id).map(|s| s.clone()))
    }

    async fn search(
        &self,
        filter: &StationFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Station>, u64)> {
        let mut matches: Vec<Station> = self
            .stations
            .iter()
            .filter(|e| {
                let s = e.value();
                filter
                    .city
                    .as_ref()
                    .map_or(true, |c| s.address.city.eq_ignore_ascii_case(c))
                    && filter
                        .state
                        .as_ref()
                        .map_or(true, |st| s.address.state.eq_ignore_ascii_case(st))
                    && filter
                        .connector_type
                        .map_or(true, |ct| s.connector_capacity(ct).is_some())
                    && filter.status.map_or(true, |st| s.status == st)
            })
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(&matches, page, limit))
    }

    async fn get_connector_capacity(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
    ) -> DomainResult<Option<ConnectorCapacity>> {
        Ok(self
            .stations
            .get(station_id)
            .and_then(|s| s.connector_capacity(connector_type).cloned()))
    }
}

// ── Reservations ───────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: DashMap<String, Reservation>,
}

fn apply_patch(reservation: &mut Reservation, patch: ReservationPatch) {
    if let Some(window) = patch.window {
        reservation.window = window;
    }
    if let Some(cost) = patch.estimated_cost {
        reservation.estimated_cost = cost;
    }
    if let Some(vehicle) = patch.vehicle_info {
        reservation.vehicle_info = Some(vehicle);
    }
    if let Some(payment) = patch.payment_info {
        reservation.payment_info = Some(payment);
    }
    if let Some(notes) = patch.notes {
        reservation.notes = Some(notes);
    }
    reservation.updated_at = Utc::now();
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, reservation: Reservation) -> DomainResult<Reservation> {
        if self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::Conflict(format!(
                "Reservation {}",
                reservation.id
            )));
        }
        self.reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn find_for_user(&self, id: &str, user_id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self
            .reservations
            .get(id)
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone()))
    }

    async fn find_overlapping(
        &self,
        station_id: &str,
        connector_type: ConnectorType,
        window: &TimeWindow,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|e| {
                let r = e.value();
                r.station_id == station_id
                    && r.connector_type == connector_type
                    && r.status.holds_capacity()
                    && r.window.overlaps(window)
                    && exclude_id.map_or(true, |ex| r.id != ex)
            })
            .map(|e| e.value().clone())
            .collect())
    }

    async fn compare_and_set(
        &self,
        id: &str,
        expected: ReservationStatus,
        new: ReservationStatus,
        patch: ReservationPatch,
    ) -> DomainResult<Option<Reservation>> {
        let Some(mut entry) = self.reservations.get_mut(id) else {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            });
        };
        if entry.status != expected {
            return Ok(None);
        }
        entry.status = new;
        apply_patch(&mut entry, patch);
        Ok(Some(entry.clone()))
    }

    async fn hard_delete(&self, id: &str) -> DomainResult<()> {
        self.reservations
            .remove(id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)> {
        let mut matches: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|e| {
                let r = e.value();
                r.user_id == user_id && status.map_or(true, |s| r.status == s)
            })
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&matches, page, limit))
    }

    async fn list_for_station(
        &self,
        station_id: &str,
        status: Option<ReservationStatus>,
        date: Option<NaiveDate>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Reservation>, u64)> {
        let day_window = date.map(|d| {
            let start = d.and_time(chrono::NaiveTime::MIN).and_utc();
            let end = start + chrono::Duration::days(1);
            TimeWindow { start, end }
        });
        let mut matches: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|e| {
                let r = e.value();
                r.station_id == station_id
                    && status.map_or(true, |s| r.status == s)
                    && day_window.map_or(true, |d| r.window.overlaps(&d))
            })
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| a.window.start.cmp(&b.window.start));
        Ok(paginate(&matches, page, limit))
    }
}

// ── Users ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    favorites: DashMap<String, BTreeSet<String>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> DomainResult<()> {
        if self.users.contains_key(&user.id) {
            return Err(DomainError::Conflict(format!("User {}", user.id)));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|e| e.value().email == email)
            .map(|e| e.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|e| e.value().username == username)
            .map(|e| e.value().clone()))
    }

    async fn update(&self, mut user: User) -> DomainResult<User> {
        if !self.users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user.id.clone(),
            });
        }
        user.updated_at = Utc::now();
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        if let Some(mut user) = self.users.get_mut(id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn add_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()> {
        let mut favorites = self.favorites.entry(user_id.to_string()).or_default();
        if !favorites.insert(station_id.to_string()) {
            return Err(DomainError::Conflict(format!(
                "Station {} is already a favorite",
                station_id
            )));
        }
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()> {
        let removed = self
            .favorites
            .get_mut(user_id)
            .map(|mut f| f.remove(station_id))
            .unwrap_or(false);
        if !removed {
            return Err(DomainError::NotFound {
                entity: "Favorite",
                field: "station_id",
                value: station_id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_favorites(&self, user_id: &str) -> DomainResult<Vec<String>> {
        Ok(self
            .favorites
            .get(user_id)
            .map(|f| f.iter().cloned().collect())
            .unwrap_or_default())
    }
}

// ── Provider ───────────────────────────────────────────────────

/// In-memory repository provider for development and testing
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    stations: InMemoryStationRepository,
    reservations: InMemoryReservationRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
