//! Reservation domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::station::ConnectorType;
use crate::domain::{DomainError, DomainResult};

/// Reservation lifecycle status
///
/// Legal transitions:
/// `pending → confirmed → active → completed`, with `cancelled` reachable
/// from every non-terminal status. `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Created, not yet confirmed. Does NOT hold connector capacity.
    Pending,
    /// Confirmed by an operator; holds capacity for its window.
    Confirmed,
    /// Charging session in progress; holds capacity.
    Active,
    /// Session finished (terminal)
    Completed,
    /// Cancelled by user or system (terminal)
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Cancelled,
        }
    }

    /// Whether this status has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether this status holds connector capacity for its time window.
    pub fn holds_capacity(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Active)
    }

    /// Central transition table. Guards beyond the table (time-window checks
    /// on activation, ownership) are enforced by the reservation service.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Active)
                | (Active, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Active, Cancelled)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window, enforcing `end > start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::InvalidTimeWindow(
                "end time must be after start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Half-open overlap test: windows that merely touch do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether an instant falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Vehicle details used for cost estimation
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleInfo {
    pub make: Option<String>,
    pub model: Option<String>,
    /// Battery capacity in kWh
    pub battery_capacity_kwh: Option<f64>,
    /// Current state of charge, 0–100
    pub current_charge_percent: Option<u8>,
}

/// Payment method tag recorded at completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    ApplePay,
    GooglePay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Paypal => "paypal",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "credit_card" => Ok(Self::CreditCard),
            "paypal" => Ok(Self::Paypal),
            "apple_pay" => Ok(Self::ApplePay),
            "google_pay" => Ok(Self::GooglePay),
            other => Err(DomainError::Validation(format!(
                "Unknown payment method: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment record attached when a session completes. No payment processing
/// happens here; this is a tag plus an external transaction reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
}

/// Connector reservation for a time slot
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub connector_type: ConnectorType,
    pub window: TimeWindow,
    /// Estimated charge cost; overwritten by the actual cost at completion
    /// when one is supplied.
    pub estimated_cost: f64,
    pub status: ReservationStatus,
    pub vehicle_info: Option<VehicleInfo>,
    pub payment_info: Option<PaymentInfo>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        user_id: impl Into<String>,
        station_id: impl Into<String>,
        connector_type: ConnectorType,
        window: TimeWindow,
        estimated_cost: f64,
        vehicle_info: Option<VehicleInfo>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            station_id: station_id.into(),
            connector_type,
            window,
            estimated_cost,
            status: ReservationStatus::Pending,
            vehicle_info,
            payment_info: None,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session is running right now.
    pub fn is_current(&self) -> bool {
        self.status == ReservationStatus::Active && self.window.contains(Utc::now())
    }

    /// Whether the reservation is scheduled for the future.
    pub fn is_upcoming(&self) -> bool {
        self.window.start > Utc::now()
            && matches!(
                self.status,
                ReservationStatus::Pending | ReservationStatus::Confirmed
            )
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 5, 10, hour, min, 0).unwrap()
    }

    fn window(start_h: u32, end_h: u32) -> TimeWindow {
        TimeWindow::new(at(start_h, 0), at(end_h, 0)).unwrap()
    }

    #[test]
    fn window_rejects_end_before_start() {
        assert!(TimeWindow::new(at(11, 0), at(10, 0)).is_err());
    }

    #[test]
    fn window_rejects_zero_length() {
        assert!(TimeWindow::new(at(10, 0), at(10, 0)).is_err());
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = window(10, 12);
        let b = window(11, 13);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let a = window(10, 11);
        let b = window(11, 12);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contained_window_overlaps() {
        let outer = window(10, 14);
        let inner = window(11, 12);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        assert!(!window(8, 9).overlaps(&window(10, 11)));
    }

    #[test]
    fn contains_is_half_open() {
        let w = window(10, 11);
        assert!(w.contains(at(10, 0)));
        assert!(w.contains(at(10, 59)));
        assert!(!w.contains(at(11, 0)));
    }

    #[test]
    fn duration_in_minutes() {
        assert_eq!(window(10, 12).duration_minutes(), 120);
    }

    #[test]
    fn status_roundtrip() {
        for status in &[
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Active,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::from_str(status.as_str()), *status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_cancelled() {
        assert_eq!(
            ReservationStatus::from_str("???"),
            ReservationStatus::Cancelled
        );
    }

    #[test]
    fn transition_table_matches_lifecycle() {
        use ReservationStatus::*;
        let all = [Pending, Confirmed, Active, Completed, Cancelled];
        let legal = [
            (Pending, Confirmed),
            (Confirmed, Active),
            (Active, Completed),
            (Pending, Cancelled),
            (Confirmed, Cancelled),
            (Active, Cancelled),
        ];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    legal.contains(&(from, to)),
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(ReservationStatus::Completed.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(!ReservationStatus::Confirmed.is_terminal());
        assert!(!ReservationStatus::Active.is_terminal());
    }

    #[test]
    fn only_confirmed_and_active_hold_capacity() {
        assert!(ReservationStatus::Confirmed.holds_capacity());
        assert!(ReservationStatus::Active.holds_capacity());
        assert!(!ReservationStatus::Pending.holds_capacity());
        assert!(!ReservationStatus::Completed.holds_capacity());
        assert!(!ReservationStatus::Cancelled.holds_capacity());
    }

    #[test]
    fn new_reservation_is_pending() {
        let r = Reservation::new(
            "u-1",
            "st-1",
            ConnectorType::Ccs,
            window(10, 11),
            14.4,
            None,
            None,
        );
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.estimated_cost, 14.4);
        assert!(r.payment_info.is_none());
    }

    #[test]
    fn upcoming_and_current_flags() {
        let future = TimeWindow::new(
            Utc::now() + Duration::hours(1),
            Utc::now() + Duration::hours(2),
        )
        .unwrap();
        let r = Reservation::new("u-1", "st-1", ConnectorType::Tesla, future, 0.0, None, None);
        assert!(r.is_upcoming());
        assert!(!r.is_current());

        let running = TimeWindow::new(
            Utc::now() - Duration::minutes(30),
            Utc::now() + Duration::minutes(30),
        )
        .unwrap();
        let mut r = Reservation::new("u-1", "st-1", ConnectorType::Tesla, running, 0.0, None, None);
        r.status = ReservationStatus::Active;
        assert!(r.is_current());
        assert!(!r.is_upcoming());
    }

    #[test]
    fn payment_method_roundtrip() {
        for m in &[
            PaymentMethod::CreditCard,
            PaymentMethod::Paypal,
            PaymentMethod::ApplePay,
            PaymentMethod::GooglePay,
        ] {
            assert_eq!(PaymentMethod::parse(m.as_str()).unwrap(), *m);
        }
        assert!(PaymentMethod::parse("cash").is_err());
    }
}
