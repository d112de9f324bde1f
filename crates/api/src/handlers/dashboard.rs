//! Handler for the dashboard metrics endpoint.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use minetrack_core::equipment::EquipmentStatus;
use minetrack_core::metrics::{compute_dashboard, DashboardMetrics};
use minetrack_db::repositories::{DowntimeRepo, EquipmentRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireViewDashboard;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/metrics
///
/// Fleet availability, MTTR, cause breakdown, and the monthly trend.
pub async fn metrics(
    RequireViewDashboard(_user): RequireViewDashboard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardMetrics>>> {
    let statuses: Vec<EquipmentStatus> = EquipmentRepo::list_status_ids(&state.pool)
        .await?
        .into_iter()
        .filter_map(EquipmentStatus::from_id)
        .collect();

    let events = DowntimeRepo::list_all(&state.pool).await?;
    let samples: Vec<_> = events.iter().filter_map(|e| e.to_sample()).collect();
    if samples.len() < events.len() {
        tracing::warn!(
            skipped = events.len() - samples.len(),
            "Skipped downtime rows with unrecognised cause or status"
        );
    }

    Ok(Json(DataResponse {
        data: compute_dashboard(&statuses, &samples, Utc::now()),
    }))
}
