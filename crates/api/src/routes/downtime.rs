//! Route definitions for the `/downtimes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::downtime;
use crate::state::AppState;

/// Routes mounted at `/downtimes`.
///
/// ```text
/// GET  /                     -> list_downtimes
/// POST /                     -> report_downtime
/// GET  /{id}                 -> get_downtime
/// POST /{id}/start-repair    -> start_repair
/// POST /{id}/close           -> close_downtime
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(downtime::list_downtimes).post(downtime::report_downtime),
        )
        .route("/{id}", get(downtime::get_downtime))
        .route("/{id}/start-repair", post(downtime::start_repair))
        .route("/{id}/close", post(downtime::close_downtime))
}
