//! Repository for the `downtime_events` table.
//!
//! Every lifecycle change also updates the status of the matching
//! equipment row inside the same transaction.

use minetrack_core::downtime::{equipment_status_for, DowntimeStatus};
use minetrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::downtime::{CreateDowntimeEvent, DowntimeEvent, DowntimeFilter};

/// Column list for `downtime_events` queries.
const COLUMNS: &str = "id, equipment_id, equipment_slug, equipment_name, equipment_type, section, \
                       reported_by, reported_by_user_id, start_time, end_time, description, cause, \
                       status_id, root_cause, repair_notes, created_at, updated_at";

/// Provides queries and lifecycle transitions for downtime events.
pub struct DowntimeRepo;

impl DowntimeRepo {
    /// Record a breakdown and take the named equipment down.
    ///
    /// The event is linked to the equipment row whose name matches
    /// case-insensitively, if any. Unregistered machines are allowed.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDowntimeEvent,
    ) -> Result<DowntimeEvent, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Take the machine down first so its id can be linked.
        let equipment_id: Option<(DbId,)> = sqlx::query_as(
            "UPDATE equipment SET status_id = $2 WHERE LOWER(name) = LOWER($1) RETURNING id",
        )
        .bind(&input.equipment_name)
        .bind(equipment_status_for(DowntimeStatus::Open).id())
        .fetch_optional(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO downtime_events
                (equipment_id, equipment_slug, equipment_name, equipment_type, section,
                 reported_by, reported_by_user_id, description, cause, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, DowntimeEvent>(&query)
            .bind(equipment_id.map(|(id,)| id))
            .bind(&input.equipment_slug)
            .bind(&input.equipment_name)
            .bind(&input.equipment_type)
            .bind(&input.section)
            .bind(&input.reported_by)
            .bind(input.reported_by_user_id)
            .bind(&input.description)
            .bind(input.cause.as_str())
            .bind(DowntimeStatus::Open.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Find an event by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DowntimeEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM downtime_events WHERE id = $1");
        sqlx::query_as::<_, DowntimeEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events newest first, optionally restricted to active or closed.
    pub async fn list(
        pool: &PgPool,
        filter: Option<DowntimeFilter>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DowntimeEvent>, sqlx::Error> {
        let condition = match filter {
            None => "",
            Some(DowntimeFilter::Active) => "WHERE status_id <> $3",
            Some(DowntimeFilter::Closed) => "WHERE status_id = $3",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM downtime_events {condition} \
             ORDER BY start_time DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, DowntimeEvent>(&query)
            .bind(limit)
            .bind(offset);
        if filter.is_some() {
            q = q.bind(DowntimeStatus::Closed.id());
        }
        q.fetch_all(pool).await
    }

    /// Every event, for dashboard aggregation.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DowntimeEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM downtime_events ORDER BY start_time DESC, id DESC");
        sqlx::query_as::<_, DowntimeEvent>(&query).fetch_all(pool).await
    }

    /// The most recent unclosed event for a registered machine.
    ///
    /// Events linked by `equipment_id` always match. Unlinked events match
    /// on the machine's current name, ignoring case.
    pub async fn find_active_for_equipment(
        pool: &PgPool,
        equipment_id: DbId,
        equipment_name: &str,
    ) -> Result<Option<DowntimeEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM downtime_events \
             WHERE status_id <> $3 \
               AND (equipment_id = $1 \
                    OR (equipment_id IS NULL AND LOWER(equipment_name) = LOWER($2))) \
             ORDER BY start_time DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, DowntimeEvent>(&query)
            .bind(equipment_id)
            .bind(equipment_name.trim())
            .bind(DowntimeStatus::Closed.id())
            .fetch_optional(pool)
            .await
    }

    /// Move an open event to `in_progress` and put the equipment under repair.
    ///
    /// Returns `None` if the event does not exist or is no longer open.
    pub async fn start_repair(pool: &PgPool, id: DbId) -> Result<Option<DowntimeEvent>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE downtime_events SET status_id = $2 \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, DowntimeEvent>(&query)
            .bind(id)
            .bind(DowntimeStatus::InProgress.id())
            .bind(DowntimeStatus::Open.id())
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref e) = event {
            sync_equipment_status(&mut tx, e, DowntimeStatus::InProgress).await?;
        }

        tx.commit().await?;
        Ok(event)
    }

    /// Close an in-progress event and return the equipment to service.
    ///
    /// Returns `None` if the event does not exist or is not in progress.
    pub async fn close(
        pool: &PgPool,
        id: DbId,
        root_cause: &str,
        repair_notes: Option<&str>,
    ) -> Result<Option<DowntimeEvent>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE downtime_events SET
                status_id = $2,
                end_time = GREATEST(NOW(), start_time),
                root_cause = $4,
                repair_notes = $5
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, DowntimeEvent>(&query)
            .bind(id)
            .bind(DowntimeStatus::Closed.id())
            .bind(DowntimeStatus::InProgress.id())
            .bind(root_cause.trim())
            .bind(repair_notes.map(str::trim).filter(|n| !n.is_empty()))
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref e) = event {
            sync_equipment_status(&mut tx, e, DowntimeStatus::Closed).await?;
        }

        tx.commit().await?;
        Ok(event)
    }
}

/// Apply the equipment status implied by `status` to the event's machine.
///
/// Linked events follow `equipment_id`, so renaming the machine does not
/// break the link. Unlinked events fall back to a case-insensitive name match.
async fn sync_equipment_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    event: &DowntimeEvent,
    status: DowntimeStatus,
) -> Result<(), sqlx::Error> {
    let equipment_status = equipment_status_for(status).id();
    let result = match event.equipment_id {
        Some(equipment_id) => {
            sqlx::query("UPDATE equipment SET status_id = $2 WHERE id = $1")
                .bind(equipment_id)
                .bind(equipment_status)
                .execute(&mut **tx)
                .await?
        }
        None => {
            sqlx::query("UPDATE equipment SET status_id = $2 WHERE LOWER(name) = LOWER($1)")
                .bind(&event.equipment_name)
                .bind(equipment_status)
                .execute(&mut **tx)
                .await?
        }
    };
    if result.rows_affected() == 0 {
        tracing::debug!(
            downtime_id = event.id,
            equipment_id = ?event.equipment_id,
            equipment_name = %event.equipment_name,
            "No registered equipment matches downtime event"
        );
    }
    Ok(())
}
