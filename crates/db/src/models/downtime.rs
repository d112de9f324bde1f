//! Downtime event model, DTOs, and response serializer.

use minetrack_core::downtime::{repair_hours, DowntimeCause, DowntimeStatus};
use minetrack_core::metrics::DowntimeSample;
use minetrack_core::status::StatusId;
use minetrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `downtime_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DowntimeEvent {
    pub id: DbId,
    pub equipment_id: Option<DbId>,
    pub equipment_slug: String,
    pub equipment_name: String,
    pub equipment_type: String,
    pub section: String,
    pub reported_by: String,
    pub reported_by_user_id: Option<DbId>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub description: String,
    pub cause: String,
    pub status_id: StatusId,
    pub root_cause: Option<String>,
    pub repair_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DowntimeEvent {
    pub fn status(&self) -> Option<DowntimeStatus> {
        DowntimeStatus::from_id(self.status_id)
    }

    pub fn cause(&self) -> Option<DowntimeCause> {
        DowntimeCause::from_str_name(&self.cause)
    }

    /// Project onto the fields the dashboard metrics need. Rows whose cause
    /// or status do not parse are skipped by returning `None`.
    pub fn to_sample(&self) -> Option<DowntimeSample> {
        Some(DowntimeSample {
            cause: self.cause()?,
            status: self.status()?,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

/// Insert payload for a validated breakdown report.
#[derive(Debug, Clone)]
pub struct CreateDowntimeEvent {
    pub equipment_slug: String,
    pub equipment_name: String,
    pub equipment_type: String,
    pub section: String,
    pub reported_by: String,
    pub reported_by_user_id: Option<DbId>,
    pub description: String,
    pub cause: DowntimeCause,
}

/// Body of `POST /downtimes/{id}/close`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseDowntime {
    pub root_cause: String,
    #[serde(default)]
    pub repair_notes: Option<String>,
}

/// Status filter accepted by the downtime list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeFilter {
    /// Not yet closed.
    Active,
    Closed,
}

/// Query parameters for `GET /downtimes`.
#[derive(Debug, Deserialize)]
pub struct DowntimeListParams {
    pub status: Option<DowntimeFilter>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Serialized downtime event as exposed to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DowntimeResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,
    pub equipment_slug: String,
    pub equipment_name: String,
    pub equipment_type: String,
    pub reported_by: String,
    pub start_time: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    pub description: String,
    pub cause: String,
    pub cause_label: &'static str,
    pub section: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_hours: Option<f64>,
    pub created_at: Timestamp,
}

impl From<DowntimeEvent> for DowntimeResponse {
    fn from(row: DowntimeEvent) -> Self {
        let status = row.status().map_or("unknown", DowntimeStatus::as_str);
        let cause_label = row.cause().map_or("Unknown", DowntimeCause::label);
        let repair_hours = row.end_time.map(|end| repair_hours(row.start_time, end));
        Self {
            id: row.id.to_string(),
            equipment_id: row.equipment_id.map(|id| id.to_string()),
            equipment_slug: row.equipment_slug,
            equipment_name: row.equipment_name,
            equipment_type: row.equipment_type,
            reported_by: row.reported_by,
            start_time: row.start_time,
            end_time: row.end_time,
            description: row.description,
            cause: row.cause,
            cause_label,
            section: row.section,
            status,
            root_cause: row.root_cause,
            repair_notes: row.repair_notes,
            repair_hours,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn row() -> DowntimeEvent {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 7, 30, 0).unwrap();
        DowntimeEvent {
            id: 12,
            equipment_id: Some(3),
            equipment_slug: "drill-rig-101".into(),
            equipment_name: "Drill Rig 101".into(),
            equipment_type: "Drill Rig".into(),
            section: "Rockets".into(),
            reported_by: "T. Moyo".into(),
            reported_by_user_id: None,
            start_time: start,
            end_time: Some(start + Duration::minutes(45)),
            description: "Boom hydraulics leaking".into(),
            cause: "hydraulic".into(),
            status_id: 3,
            root_cause: Some("Worn seal".into()),
            repair_notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn response_carries_labels_and_duration() {
        let response = DowntimeResponse::from(row());
        assert_eq!(response.id, "12");
        assert_eq!(response.equipment_id.as_deref(), Some("3"));
        assert_eq!(response.status, "closed");
        assert_eq!(response.cause_label, "Hydraulic");
        assert_eq!(response.repair_hours, Some(0.75));
    }

    #[test]
    fn sample_skips_unparseable_rows() {
        assert!(row().to_sample().is_some());
        let mut bad = row();
        bad.cause = "sabotage".into();
        assert!(bad.to_sample().is_none());
    }
}
