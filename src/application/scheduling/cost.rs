//! Charging cost estimation
//!
//! Pure computation over station pricing, a time window, and optional
//! vehicle data. Called at reservation creation and whenever the time
//! window changes.

use crate::domain::{Pricing, TimeWindow, VehicleInfo};

/// Fraction of battery capacity assumed to be charged in one session.
/// A simplifying assumption, not a physical measurement.
const CHARGE_FRACTION: f64 = 0.8;

/// Estimate the cost of a charging session.
///
/// Rate selection, in priority order:
/// 1. `per_kwh` with a known battery capacity: charge-to-80% energy estimate
/// 2. `per_minute`: billed by window duration
/// 3. no usable rate: zero
///
/// A `session_fee` is added on top when present. The result is non-negative
/// as long as the pricing fields and battery capacity are (validated at the
/// boundary).
pub fn estimate_cost(
    pricing: &Pricing,
    window: &TimeWindow,
    vehicle_info: Option<&VehicleInfo>,
) -> f64 {
    let battery_capacity = vehicle_info.and_then(|v| v.battery_capacity_kwh);

    let rate_cost = match (pricing.per_kwh, battery_capacity) {
        (Some(per_kwh), Some(capacity_kwh)) => capacity_kwh * CHARGE_FRACTION * per_kwh,
        _ => match pricing.per_minute {
            Some(per_minute) => window.duration_minutes() as f64 * per_minute,
            None => 0.0,
        },
    };

    rate_cost + pricing.session_fee.unwrap_or(0.0)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn one_hour_window() -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2030, 5, 10, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 5, 10, 11, 0, 0).unwrap();
        TimeWindow::new(start, end).unwrap()
    }

    fn vehicle(capacity_kwh: f64) -> VehicleInfo {
        VehicleInfo {
            make: Some("Tesla".into()),
            model: Some("Model 3".into()),
            battery_capacity_kwh: Some(capacity_kwh),
            current_charge_percent: Some(20),
        }
    }

    fn pricing(per_kwh: Option<f64>, per_minute: Option<f64>, session_fee: Option<f64>) -> Pricing {
        Pricing {
            per_kwh,
            per_minute,
            session_fee,
            currency: "USD".into(),
        }
    }

    #[test]
    fn per_kwh_with_battery_capacity() {
        // 60 kWh * 0.8 * 0.30 = 14.4
        let cost = estimate_cost(
            &pricing(Some(0.30), None, None),
            &one_hour_window(),
            Some(&vehicle(60.0)),
        );
        assert!((cost - 14.4).abs() < 1e-9);
    }

    #[test]
    fn per_kwh_plus_session_fee() {
        let cost = estimate_cost(
            &pricing(Some(0.30), None, Some(2.0)),
            &one_hour_window(),
            Some(&vehicle(60.0)),
        );
        assert!((cost - 16.4).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_per_minute_without_battery_capacity() {
        // 60 minutes * 0.25 = 15.0
        let cost = estimate_cost(
            &pricing(Some(0.30), Some(0.25), None),
            &one_hour_window(),
            None,
        );
        assert!((cost - 15.0).abs() < 1e-9);
    }

    #[test]
    fn per_minute_when_no_kwh_rate() {
        let cost = estimate_cost(
            &pricing(None, Some(0.10), None),
            &one_hour_window(),
            Some(&vehicle(60.0)),
        );
        assert!((cost - 6.0).abs() < 1e-9);
    }

    #[test]
    fn session_fee_only() {
        let cost = estimate_cost(&pricing(None, None, Some(3.5)), &one_hour_window(), None);
        assert!((cost - 3.5).abs() < 1e-9);
    }

    #[test]
    fn no_pricing_is_free() {
        let cost = estimate_cost(&pricing(None, None, None), &one_hour_window(), None);
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn unknown_battery_capacity_is_ignored() {
        let mut v = vehicle(60.0);
        v.battery_capacity_kwh = None;
        let cost = estimate_cost(
            &pricing(Some(0.30), Some(0.10), None),
            &one_hour_window(),
            Some(&v),
        );
        assert!((cost - 6.0).abs() < 1e-9);
    }

    #[test]
    fn same_window_gives_same_estimate() {
        let p = pricing(Some(0.30), None, Some(1.0));
        let v = vehicle(75.0);
        let a = estimate_cost(&p, &one_hour_window(), Some(&v));
        let b = estimate_cost(&p, &one_hour_window(), Some(&v));
        assert_eq!(a, b);
    }
}
