//! Handlers for breakdown reports and the repair workflow.
//!
//! A report opens an event and takes the machine down. Maintenance moves it
//! to in-progress (machine under repair) and finally closes it with a root
//! cause (machine running again).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use minetrack_core::downtime::{validate_close, validate_report, BreakdownReport, DowntimeStatus};
use minetrack_core::error::CoreError;
use minetrack_core::search::{clamp_limit, clamp_offset};
use minetrack_core::types::DbId;
use minetrack_db::models::downtime::{
    CloseDowntime, CreateDowntimeEvent, DowntimeEvent, DowntimeListParams, DowntimeResponse,
};
use minetrack_db::repositories::DowntimeRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::{
    RequireCloseDowntime, RequireReportDowntime, RequireStartRepair, RequireViewDowntimes,
};
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "DowntimeEvent";

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// GET /downtimes
// ---------------------------------------------------------------------------

/// List downtime events newest first, optionally `?status=active|closed`.
pub async fn list_downtimes(
    RequireViewDowntimes(_user): RequireViewDowntimes,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<DowntimeListParams>,
) -> AppResult<Json<DataResponse<Vec<DowntimeResponse>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let events = DowntimeRepo::list(&state.pool, params.status, limit, offset).await?;

    Ok(Json(DataResponse {
        data: events.into_iter().map(DowntimeResponse::from).collect(),
    }))
}

// ---------------------------------------------------------------------------
// POST /downtimes
// ---------------------------------------------------------------------------

/// Report a breakdown. The reporter is taken from the token.
pub async fn report_downtime(
    RequireReportDowntime(user): RequireReportDowntime,
    State(state): State<AppState>,
    AppJson(input): AppJson<BreakdownReport>,
) -> AppResult<impl IntoResponse> {
    let report = validate_report(&input)?;

    let event = DowntimeRepo::create(
        &state.pool,
        &CreateDowntimeEvent {
            equipment_slug: report.equipment_slug,
            equipment_name: report.equipment_name,
            equipment_type: report.equipment_type,
            section: report.section,
            reported_by: user.name.clone(),
            reported_by_user_id: Some(user.user_id),
            description: report.description,
            cause: report.cause,
        },
    )
    .await?;

    tracing::info!(
        downtime_id = event.id,
        equipment = %event.equipment_name,
        linked = event.equipment_id.is_some(),
        cause = %event.cause,
        user_id = user.user_id,
        "Breakdown reported",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DowntimeResponse::from(event),
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /downtimes/{id}
// ---------------------------------------------------------------------------

pub async fn get_downtime(
    RequireViewDowntimes(_user): RequireViewDowntimes,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<DowntimeResponse>>> {
    let event = find_event(&state, id).await?;
    Ok(Json(DataResponse { data: event.into() }))
}

// ---------------------------------------------------------------------------
// POST /downtimes/{id}/start-repair
// ---------------------------------------------------------------------------

/// Move an open event to in-progress.
pub async fn start_repair(
    RequireStartRepair(user): RequireStartRepair,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<DowntimeResponse>>> {
    let event = find_event(&state, id).await?;
    check_transition(&event, DowntimeStatus::InProgress)?;

    let event = DowntimeRepo::start_repair(&state.pool, id)
        .await?
        .ok_or_else(|| concurrent_change(id))?;

    tracing::info!(downtime_id = id, user_id = user.user_id, "Repair started");

    Ok(Json(DataResponse { data: event.into() }))
}

// ---------------------------------------------------------------------------
// POST /downtimes/{id}/close
// ---------------------------------------------------------------------------

/// Close an in-progress event with a mandatory root cause.
pub async fn close_downtime(
    RequireCloseDowntime(user): RequireCloseDowntime,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CloseDowntime>,
) -> AppResult<Json<DataResponse<DowntimeResponse>>> {
    validate_close(&input.root_cause, input.repair_notes.as_deref())?;

    let event = find_event(&state, id).await?;
    check_transition(&event, DowntimeStatus::Closed)?;

    let event = DowntimeRepo::close(
        &state.pool,
        id,
        &input.root_cause,
        input.repair_notes.as_deref(),
    )
    .await?
    .ok_or_else(|| concurrent_change(id))?;

    tracing::info!(
        downtime_id = id,
        user_id = user.user_id,
        equipment = %event.equipment_name,
        "Downtime closed",
    );

    Ok(Json(DataResponse { data: event.into() }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_event(state: &AppState, id: DbId) -> AppResult<DowntimeEvent> {
    DowntimeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))
}

fn check_transition(event: &DowntimeEvent, next: DowntimeStatus) -> AppResult<()> {
    let current = event.status().ok_or_else(|| {
        AppError::InternalError(format!(
            "Downtime {} has unknown status id {}",
            event.id, event.status_id
        ))
    })?;
    minetrack_core::downtime::validate_transition(current, next)?;
    Ok(())
}

/// The row left the expected state between the read and the update.
fn concurrent_change(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Downtime event {id} was modified by another request"
    )))
}
