//! Equipment status definitions and input validation.
//!
//! Equipment rows reference the `equipment_statuses` lookup table; the enum
//! below mirrors its seed data.

use crate::define_status_enum;
use crate::error::CoreError;

define_status_enum! {
    /// Operational status of a piece of mining equipment.
    EquipmentStatus {
        Running = 1 => "running",
        Down = 2 => "down",
        UnderRepair = 3 => "under_repair",
        Idle = 4 => "idle",
    }
}

impl EquipmentStatus {
    /// Human-readable label shown on status badges.
    pub fn label(self) -> &'static str {
        match self {
            EquipmentStatus::Running => "Running",
            EquipmentStatus::Down => "Down",
            EquipmentStatus::UnderRepair => "Under Repair",
            EquipmentStatus::Idle => "Idle",
        }
    }

    /// Whether the machine counts as "currently down" on the dashboard.
    pub fn is_out_of_service(self) -> bool {
        matches!(self, EquipmentStatus::Down | EquipmentStatus::UnderRepair)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Maximum length for name, machine type, section, and location.
pub const MAX_FIELD_LENGTH: usize = 200;

/// Validate a required text field: non-blank after trimming and within
/// [`MAX_FIELD_LENGTH`].
pub fn validate_required_field(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_FIELD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional text field. `None` is always valid.
pub fn validate_optional_field(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_required_field(field, v),
        None => Ok(()),
    }
}

/// Validate a status wire name, returning the parsed status.
pub fn parse_status(status: &str) -> Result<EquipmentStatus, CoreError> {
    EquipmentStatus::from_str_name(status).ok_or_else(|| {
        let valid: Vec<&str> = EquipmentStatus::ALL.iter().map(|s| s.as_str()).collect();
        CoreError::Validation(format!(
            "Invalid equipment status '{status}'. Must be one of: {valid:?}"
        ))
    })
}

/// Location defaults to the section when not supplied.
pub fn resolve_location(location: Option<&str>, section: &str) -> String {
    match location.map(str::trim) {
        Some(loc) if !loc.is_empty() => loc.to_string(),
        _ => section.trim().to_string(),
    }
}
