//! Route definitions for the `/equipment` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::equipment;
use crate::state::AppState;

/// Routes mounted at `/equipment`.
///
/// ```text
/// GET    /                       -> list_equipment
/// POST   /                       -> create_equipment
/// GET    /{id}                   -> get_equipment
/// PUT    /{id}                   -> update_equipment
/// DELETE /{id}                   -> delete_equipment
/// PATCH  /{id}/status            -> update_equipment_status
/// GET    /{id}/active-downtime   -> active_downtime
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route(
            "/{id}",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route("/{id}/status", patch(equipment::update_equipment_status))
        .route("/{id}/active-downtime", get(equipment::active_downtime))
}
