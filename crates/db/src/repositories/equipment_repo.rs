//! Repository for the `equipment` table.

use minetrack_core::equipment::EquipmentStatus;
use minetrack_core::status::StatusId;
use minetrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::equipment::{CreateEquipment, Equipment, UpdateEquipment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, machine_type, section, location, status_id, \
                       serial_number, installation_date, last_maintenance, created_at, updated_at";

/// Provides CRUD operations for equipment.
pub struct EquipmentRepo;

impl EquipmentRepo {
    /// Insert a new machine, returning the created row.
    ///
    /// `location` falls back to `section` and `status` to Running (1).
    pub async fn create(pool: &PgPool, input: &CreateEquipment) -> Result<Equipment, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment
                (name, machine_type, section, location, status_id,
                 serial_number, installation_date, last_maintenance)
             VALUES ($1, $2, $3, COALESCE($4, $3), COALESCE($5, 1), $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(input.name.trim())
            .bind(input.machine_type.trim())
            .bind(input.section.trim())
            .bind(input.location.as_deref().map(str::trim).filter(|l| !l.is_empty()))
            .bind(input.status.map(EquipmentStatus::id))
            .bind(input.serial_number.as_deref().map(str::trim))
            .bind(input.installation_date)
            .bind(input.last_maintenance)
            .fetch_one(pool)
            .await
    }

    /// Find a machine by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE id = $1");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a machine by name, ignoring case and surrounding whitespace.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    /// List every machine in registration order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment ORDER BY id ASC");
        sqlx::query_as::<_, Equipment>(&query).fetch_all(pool).await
    }

    /// Update a machine. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEquipment,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment SET
                name = COALESCE($2, name),
                machine_type = COALESCE($3, machine_type),
                section = COALESCE($4, section),
                location = COALESCE($5, location),
                serial_number = COALESCE($6, serial_number),
                installation_date = COALESCE($7, installation_date),
                last_maintenance = COALESCE($8, last_maintenance)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.machine_type.as_deref().map(str::trim))
            .bind(input.section.as_deref().map(str::trim))
            .bind(input.location.as_deref().map(str::trim))
            .bind(input.serial_number.as_deref().map(str::trim))
            .bind(input.installation_date)
            .bind(input.last_maintenance)
            .fetch_optional(pool)
            .await
    }

    /// Set a machine's status by ID. Returns `None` if the row does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: EquipmentStatus,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("UPDATE equipment SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Set the status of the machine whose name matches case-insensitively.
    ///
    /// Returns `None` when no machine carries that name; downtime may be
    /// reported against unregistered equipment.
    pub async fn set_status_by_name(
        pool: &PgPool,
        name: &str,
        status: EquipmentStatus,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment SET status_id = $2 WHERE LOWER(name) = LOWER($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(name.trim())
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Total number of registered machines.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM equipment")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Status id of every machine, for dashboard aggregation.
    pub async fn list_status_ids(pool: &PgPool) -> Result<Vec<StatusId>, sqlx::Error> {
        let rows: Vec<(StatusId,)> = sqlx::query_as("SELECT status_id FROM equipment ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Permanently delete a machine. Returns `true` if a row was removed.
    ///
    /// Downtime history survives with `equipment_id` set to NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
