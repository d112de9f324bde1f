//! Dashboard metrics over equipment and downtime history.
//!
//! The `core` crate contains no database dependencies; callers load the
//! equipment statuses and downtime samples and pass them in along with the
//! reference instant `now`.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::downtime::{repair_hours, DowntimeCause, DowntimeStatus};
use crate::equipment::EquipmentStatus;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of calendar months covered by the monthly trend, current included.
pub const TREND_MONTHS: u32 = 6;

/// Window for the "this week" figures.
pub const WEEK_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The subset of a downtime event the metrics need.
#[derive(Debug, Clone)]
pub struct DowntimeSample {
    pub cause: DowntimeCause,
    pub status: DowntimeStatus,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseCount {
    pub cause: DowntimeCause,
    pub label: &'static str,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Short label such as `Mar 26`.
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_equipment: i64,
    pub currently_down: i64,
    pub active_downtimes: i64,
    pub total_downtimes: i64,
    pub week_downtimes: i64,
    pub mttr_hours: f64,
    pub week_mttr_hours: f64,
    pub downtime_by_cause: Vec<CauseCount>,
    pub monthly_trends: Vec<MonthlyCount>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute the full dashboard metric set.
pub fn compute_dashboard(
    equipment: &[EquipmentStatus],
    downtimes: &[DowntimeSample],
    now: Timestamp,
) -> DashboardMetrics {
    let week_start = now - Duration::days(WEEK_DAYS);
    let this_week: Vec<&DowntimeSample> = downtimes
        .iter()
        .filter(|d| d.start_time >= week_start)
        .collect();

    DashboardMetrics {
        total_equipment: equipment.len() as i64,
        currently_down: equipment.iter().filter(|s| s.is_out_of_service()).count() as i64,
        active_downtimes: downtimes.iter().filter(|d| d.status.is_active()).count() as i64,
        total_downtimes: downtimes.len() as i64,
        week_downtimes: this_week.len() as i64,
        mttr_hours: mean_repair_hours(downtimes.iter()),
        week_mttr_hours: mean_repair_hours(this_week.into_iter()),
        downtime_by_cause: count_by_cause(downtimes),
        monthly_trends: monthly_trends(downtimes, now),
    }
}

/// Mean time to repair over closed events.
///
/// Closed events without an end time add nothing to the sum but still count
/// toward the divisor. Returns `0.0` when there are no closed events.
pub fn mean_repair_hours<'a>(events: impl Iterator<Item = &'a DowntimeSample>) -> f64 {
    let (sum, closed) = events
        .filter(|d| d.status == DowntimeStatus::Closed)
        .fold((0.0_f64, 0_u32), |(sum, n), d| {
            let hours = d.end_time.map_or(0.0, |end| repair_hours(d.start_time, end));
            (sum + hours, n + 1)
        });
    if closed == 0 {
        0.0
    } else {
        sum / f64::from(closed)
    }
}

/// Event counts per cause, most frequent first, ties by cause name.
pub fn count_by_cause(downtimes: &[DowntimeSample]) -> Vec<CauseCount> {
    let mut counts: BTreeMap<DowntimeCause, i64> = BTreeMap::new();
    for d in downtimes {
        *counts.entry(d.cause).or_default() += 1;
    }
    let mut out: Vec<CauseCount> = counts
        .into_iter()
        .map(|(cause, count)| CauseCount {
            cause,
            label: cause.label(),
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.cause.as_str().cmp(b.cause.as_str()))
    });
    out
}

/// Events started in each of the last [`TREND_MONTHS`] calendar months
/// (UTC), oldest first.
pub fn monthly_trends(downtimes: &[DowntimeSample], now: Timestamp) -> Vec<MonthlyCount> {
    let today = now.date_naive();
    (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let first = months_back(today, back);
            let next = next_month(first);
            let count = downtimes
                .iter()
                .filter(|d| {
                    let day = d.start_time.date_naive();
                    day >= first && day < next
                })
                .count() as i64;
            MonthlyCount {
                month: first.format("%b %y").to_string(),
                count,
            }
        })
        .collect()
}

/// First day of the month `back` months before `day`'s month.
fn months_back(day: NaiveDate, back: u32) -> NaiveDate {
    month_start(day.year() * 12 + day.month0() as i32 - back as i32, day)
}

fn next_month(first: NaiveDate) -> NaiveDate {
    month_start(first.year() * 12 + first.month0() as i32 + 1, first)
}

/// First day of the month at absolute index `year * 12 + month0`.
fn month_start(index: i32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or(fallback)
}
