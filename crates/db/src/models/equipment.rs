//! Equipment entity model, DTOs, and response serializer.

use minetrack_core::equipment::EquipmentStatus;
use minetrack_core::status::StatusId;
use minetrack_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `equipment` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Equipment {
    pub id: DbId,
    pub name: String,
    pub machine_type: String,
    pub section: String,
    pub location: String,
    pub status_id: StatusId,
    pub serial_number: Option<String>,
    pub installation_date: Option<Date>,
    pub last_maintenance: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Equipment {
    /// Typed status. `None` only if the lookup table and enum drift apart.
    pub fn status(&self) -> Option<EquipmentStatus> {
        EquipmentStatus::from_id(self.status_id)
    }
}

/// DTO for registering a new machine.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipment {
    pub name: String,
    pub machine_type: String,
    pub section: String,
    /// Defaults to the section if omitted.
    pub location: Option<String>,
    /// Defaults to `running` if omitted.
    pub status: Option<EquipmentStatus>,
    pub serial_number: Option<String>,
    pub installation_date: Option<Date>,
    pub last_maintenance: Option<Date>,
}

/// DTO for updating a machine. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEquipment {
    pub name: Option<String>,
    pub machine_type: Option<String>,
    pub section: Option<String>,
    pub location: Option<String>,
    pub serial_number: Option<String>,
    pub installation_date: Option<Date>,
    pub last_maintenance: Option<Date>,
}

/// DTO for `PATCH /equipment/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEquipmentStatus {
    pub status: String,
}

/// Serialized equipment as exposed to API clients and the inspect tool.
///
/// Ids are rendered as strings and the status as its wire name; optional
/// fields are omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentResponse {
    pub id: String,
    pub name: String,
    pub machine_type: String,
    pub section: String,
    pub location: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_maintenance: Option<Date>,
}

impl From<Equipment> for EquipmentResponse {
    fn from(row: Equipment) -> Self {
        let status = row.status().map_or("unknown", EquipmentStatus::as_str);
        Self {
            id: row.id.to_string(),
            name: row.name,
            machine_type: row.machine_type,
            section: row.section,
            location: row.location,
            status,
            serial_number: row.serial_number,
            installation_date: row.installation_date,
            last_maintenance: row.last_maintenance,
        }
    }
}

/// Serialize a collection of rows, preserving order.
pub fn serialize_many(rows: Vec<Equipment>) -> Vec<EquipmentResponse> {
    rows.into_iter().map(EquipmentResponse::from).collect()
}
