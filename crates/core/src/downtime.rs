//! Downtime event causes, lifecycle, and validation.
//!
//! A downtime event moves through `open -> in_progress -> closed`. Reporting
//! takes equipment down, starting repair puts it under repair, and closing
//! returns it to service.

use serde::{Deserialize, Serialize};

use crate::define_status_enum;
use crate::equipment::{validate_required_field, EquipmentStatus};
use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Causes
// ---------------------------------------------------------------------------

/// Reported cause of a breakdown. Stored as TEXT with a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeCause {
    Mechanical,
    Electrical,
    Hydraulic,
    Structural,
    OperatorError,
    Scheduled,
    Other,
}

impl DowntimeCause {
    pub const ALL: &'static [DowntimeCause] = &[
        DowntimeCause::Mechanical,
        DowntimeCause::Electrical,
        DowntimeCause::Hydraulic,
        DowntimeCause::Structural,
        DowntimeCause::OperatorError,
        DowntimeCause::Scheduled,
        DowntimeCause::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DowntimeCause::Mechanical => "mechanical",
            DowntimeCause::Electrical => "electrical",
            DowntimeCause::Hydraulic => "hydraulic",
            DowntimeCause::Structural => "structural",
            DowntimeCause::OperatorError => "operator_error",
            DowntimeCause::Scheduled => "scheduled",
            DowntimeCause::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DowntimeCause::Mechanical => "Mechanical",
            DowntimeCause::Electrical => "Electrical",
            DowntimeCause::Hydraulic => "Hydraulic",
            DowntimeCause::Structural => "Structural",
            DowntimeCause::OperatorError => "Operator Error",
            DowntimeCause::Scheduled => "Scheduled Maintenance",
            DowntimeCause::Other => "Other",
        }
    }

    pub fn from_str_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for DowntimeCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a cause wire name, returning the parsed cause.
pub fn parse_cause(cause: &str) -> Result<DowntimeCause, CoreError> {
    DowntimeCause::from_str_name(cause).ok_or_else(|| {
        let valid: Vec<&str> = DowntimeCause::ALL.iter().map(|c| c.as_str()).collect();
        CoreError::Validation(format!(
            "Invalid downtime cause '{cause}'. Must be one of: {valid:?}"
        ))
    })
}

// ---------------------------------------------------------------------------
// Status and transitions
// ---------------------------------------------------------------------------

define_status_enum! {
    /// Downtime event lifecycle status.
    DowntimeStatus {
        Open = 1 => "open",
        InProgress = 2 => "in_progress",
        Closed = 3 => "closed",
    }
}

impl DowntimeStatus {
    /// An event is active until it has been closed.
    pub fn is_active(self) -> bool {
        self != DowntimeStatus::Closed
    }
}

/// Returns the statuses that `from` may transition to.
///
/// - `open`        -> `in_progress`
/// - `in_progress` -> `closed`
/// - `closed`      -> (terminal)
pub fn valid_transitions(from: DowntimeStatus) -> &'static [DowntimeStatus] {
    match from {
        DowntimeStatus::Open => &[DowntimeStatus::InProgress],
        DowntimeStatus::InProgress => &[DowntimeStatus::Closed],
        DowntimeStatus::Closed => &[],
    }
}

/// Validate that a transition from `current` to `next` is allowed.
pub fn validate_transition(current: DowntimeStatus, next: DowntimeStatus) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition downtime from '{current}' to '{next}'"
        )))
    }
}

/// The equipment status implied by a downtime entering `status`.
pub fn equipment_status_for(status: DowntimeStatus) -> EquipmentStatus {
    match status {
        DowntimeStatus::Open => EquipmentStatus::Down,
        DowntimeStatus::InProgress => EquipmentStatus::UnderRepair,
        DowntimeStatus::Closed => EquipmentStatus::Running,
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Placeholder stored when the reporter leaves machine type or section blank.
pub const UNKNOWN: &str = "Unknown";

/// Maximum length of free-text fields (description, root cause, notes).
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Breakdown report as submitted, before normalisation.
#[derive(Debug, Clone, Deserialize)]
pub struct BreakdownReport {
    pub equipment_name: String,
    #[serde(default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    pub description: String,
    pub cause: String,
}

/// A validated, trimmed breakdown report ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReport {
    pub equipment_name: String,
    pub equipment_slug: String,
    pub equipment_type: String,
    pub section: String,
    pub description: String,
    pub cause: DowntimeCause,
}

/// Validate and normalise a breakdown report.
pub fn validate_report(report: &BreakdownReport) -> Result<ValidatedReport, CoreError> {
    validate_required_field("equipment_name", &report.equipment_name)?;
    validate_text("description", &report.description)?;
    let cause = parse_cause(report.cause.trim())?;

    let equipment_name = report.equipment_name.trim().to_string();
    Ok(ValidatedReport {
        equipment_slug: equipment_slug(&equipment_name),
        equipment_type: or_unknown(report.equipment_type.as_deref()),
        section: or_unknown(report.section.as_deref()),
        description: report.description.trim().to_string(),
        cause,
        equipment_name,
    })
}

/// Validate a close request: root cause is mandatory, notes are optional.
pub fn validate_close(root_cause: &str, repair_notes: Option<&str>) -> Result<(), CoreError> {
    if root_cause.trim().is_empty() {
        return Err(CoreError::Validation("Root cause is required".into()));
    }
    validate_text("root_cause", root_cause)?;
    if let Some(notes) = repair_notes {
        if notes.chars().count() > MAX_TEXT_LENGTH {
            return Err(CoreError::Validation(format!(
                "repair_notes exceeds maximum length of {MAX_TEXT_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Lowercase the name and collapse whitespace runs into single hyphens.
pub fn equipment_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Elapsed repair time in hours. Negative spans clamp to zero.
pub fn repair_hours(start: Timestamp, end: Timestamp) -> f64 {
    let millis = (end - start).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn report(name: &str, cause: &str) -> BreakdownReport {
        BreakdownReport {
            equipment_name: name.to_string(),
            equipment_type: None,
            section: Some("  ".to_string()),
            description: " Hydraulic hose burst ".to_string(),
            cause: cause.to_string(),
        }
    }

    #[test]
    fn cause_labels() {
        assert_eq!(DowntimeCause::Scheduled.label(), "Scheduled Maintenance");
        assert_eq!(DowntimeCause::OperatorError.label(), "Operator Error");
        assert_eq!(DowntimeCause::OperatorError.as_str(), "operator_error");
    }

    #[test]
    fn unknown_cause_is_rejected() {
        assert_matches!(parse_cause("gremlins"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn status_ids_match_seed_data() {
        assert_eq!(DowntimeStatus::Open.id(), 1);
        assert_eq!(DowntimeStatus::InProgress.id(), 2);
        assert_eq!(DowntimeStatus::Closed.id(), 3);
    }

    #[test]
    fn lifecycle_is_linear() {
        assert!(validate_transition(DowntimeStatus::Open, DowntimeStatus::InProgress).is_ok());
        assert!(validate_transition(DowntimeStatus::InProgress, DowntimeStatus::Closed).is_ok());
        assert!(validate_transition(DowntimeStatus::Open, DowntimeStatus::Closed).is_err());
        assert!(validate_transition(DowntimeStatus::Closed, DowntimeStatus::Open).is_err());
        assert!(validate_transition(DowntimeStatus::InProgress, DowntimeStatus::Open).is_err());
    }

    #[test]
    fn transitions_drive_equipment_status() {
        assert_eq!(equipment_status_for(DowntimeStatus::Open), EquipmentStatus::Down);
        assert_eq!(
            equipment_status_for(DowntimeStatus::InProgress),
            EquipmentStatus::UnderRepair
        );
        assert_eq!(equipment_status_for(DowntimeStatus::Closed), EquipmentStatus::Running);
    }

    #[test]
    fn report_is_trimmed_and_defaulted() {
        let validated = validate_report(&report("  LHD  201 ", "hydraulic")).unwrap();
        assert_eq!(validated.equipment_name, "LHD  201");
        assert_eq!(validated.equipment_slug, "lhd-201");
        assert_eq!(validated.equipment_type, UNKNOWN);
        assert_eq!(validated.section, UNKNOWN);
        assert_eq!(validated.description, "Hydraulic hose burst");
        assert_eq!(validated.cause, DowntimeCause::Hydraulic);
    }

    #[test]
    fn report_requires_name_and_description() {
        assert!(validate_report(&report("", "other")).is_err());
        let mut r = report("Truck 401", "other");
        r.description = "\n".into();
        assert!(validate_report(&r).is_err());
    }

    #[test]
    fn close_requires_root_cause() {
        assert!(validate_close(" ", None).is_err());
        assert!(validate_close("Seal failure", Some("")).is_ok());
    }

    #[test]
    fn repair_hours_spans() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(repair_hours(start, start + Duration::minutes(90)), 1.5);
        assert_eq!(repair_hours(start, start - Duration::hours(1)), 0.0);
    }
}
