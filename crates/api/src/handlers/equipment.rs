//! Handlers for the `/equipment` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use minetrack_core::equipment::{parse_status, validate_optional_field, validate_required_field};
use minetrack_core::search::matches_equipment_search;
use minetrack_core::types::DbId;
use minetrack_db::models::downtime::DowntimeResponse;
use minetrack_db::models::equipment::{
    serialize_many, CreateEquipment, EquipmentResponse, UpdateEquipment, UpdateEquipmentStatus,
};
use minetrack_db::repositories::{DowntimeRepo, EquipmentRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::{RequireManageEquipment, RequireViewEquipment};
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Equipment";

/// GET /api/v1/equipment?search=
///
/// The search matches name, machine type, or section, case-insensitively.
pub async fn list_equipment(
    RequireViewEquipment(_user): RequireViewEquipment,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<EquipmentResponse>>>> {
    let mut rows = EquipmentRepo::list(&state.pool).await?;
    if let Some(query) = params.search.as_deref() {
        rows.retain(|e| matches_equipment_search(&e.name, &e.machine_type, &e.section, query));
    }
    Ok(Json(DataResponse {
        data: serialize_many(rows),
    }))
}

/// GET /api/v1/equipment/{id}
pub async fn get_equipment(
    RequireViewEquipment(_user): RequireViewEquipment,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<EquipmentResponse>>> {
    let equipment = EquipmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse {
        data: equipment.into(),
    }))
}

/// POST /api/v1/equipment
///
/// Names are unique ignoring case; a duplicate yields 409.
pub async fn create_equipment(
    RequireManageEquipment(user): RequireManageEquipment,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateEquipment>,
) -> AppResult<impl IntoResponse> {
    validate_required_field("name", &input.name)?;
    validate_required_field("machine_type", &input.machine_type)?;
    validate_required_field("section", &input.section)?;
    validate_optional_field("serial_number", input.serial_number.as_deref())?;
    if let Some(location) = input.location.as_deref().filter(|l| !l.trim().is_empty()) {
        validate_required_field("location", location)?;
    }

    let equipment = EquipmentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        equipment_id = equipment.id,
        name = %equipment.name,
        user_id = user.user_id,
        "Equipment registered",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: EquipmentResponse::from(equipment),
        }),
    ))
}

/// PUT /api/v1/equipment/{id}
pub async fn update_equipment(
    RequireManageEquipment(user): RequireManageEquipment,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateEquipment>,
) -> AppResult<Json<DataResponse<EquipmentResponse>>> {
    validate_optional_field("name", input.name.as_deref())?;
    validate_optional_field("machine_type", input.machine_type.as_deref())?;
    validate_optional_field("section", input.section.as_deref())?;
    validate_optional_field("location", input.location.as_deref())?;
    validate_optional_field("serial_number", input.serial_number.as_deref())?;

    let equipment = EquipmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    tracing::info!(equipment_id = id, user_id = user.user_id, "Equipment updated");

    Ok(Json(DataResponse {
        data: equipment.into(),
    }))
}

/// PATCH /api/v1/equipment/{id}/status
pub async fn update_equipment_status(
    RequireManageEquipment(user): RequireManageEquipment,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateEquipmentStatus>,
) -> AppResult<Json<DataResponse<EquipmentResponse>>> {
    let status = parse_status(input.status.trim())?;

    let equipment = EquipmentRepo::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    tracing::info!(
        equipment_id = id,
        status = %status,
        user_id = user.user_id,
        "Equipment status set",
    );

    Ok(Json(DataResponse {
        data: equipment.into(),
    }))
}

/// DELETE /api/v1/equipment/{id}
pub async fn delete_equipment(
    RequireManageEquipment(user): RequireManageEquipment,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !EquipmentRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    tracing::info!(equipment_id = id, user_id = user.user_id, "Equipment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/equipment/{id}/active-downtime
///
/// The machine's latest unclosed downtime event, or `null` in `data`.
pub async fn active_downtime(
    RequireViewEquipment(_user): RequireViewEquipment,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Option<DowntimeResponse>>>> {
    let equipment = EquipmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    let event = DowntimeRepo::find_active_for_equipment(&state.pool, equipment.id, &equipment.name)
        .await?;

    Ok(Json(DataResponse {
        data: event.map(DowntimeResponse::from),
    }))
}
