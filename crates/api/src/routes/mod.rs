pub mod auth;
pub mod dashboard;
pub mod downtime;
pub mod equipment;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          sign in (public)
/// /auth/me                             current user + access (auth)
/// /roles                               role catalogue (public)
///
/// /equipment                           list (?search=), register
/// /equipment/{id}                      get, update, delete
/// /equipment/{id}/status               set status (PATCH)
/// /equipment/{id}/active-downtime      latest unclosed event
///
/// /downtimes                           list (?status=active|closed), report
/// /downtimes/{id}                      get
/// /downtimes/{id}/start-repair         open -> in_progress (POST)
/// /downtimes/{id}/close                in_progress -> closed (POST)
///
/// /dashboard/metrics                   fleet metrics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/roles", get(handlers::auth::list_roles))
        .nest("/equipment", equipment::router())
        .nest("/downtimes", downtime::router())
        .nest("/dashboard", dashboard::router())
}
