//! HTTP-level integration tests for breakdown reports and the repair workflow.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, token_for};
use minetrack_core::roles::UserRole;
use minetrack_db::repositories::EquipmentRepo;
use sqlx::PgPool;

fn report(name: &str) -> serde_json::Value {
    serde_json::json!({
        "equipment_name": name,
        "equipment_type": "LHD",
        "section": "Canaan",
        "description": "Bucket cylinder leaking",
        "cause": "hydraulic",
    })
}

/// Report a breakdown as an operator and return the event id.
async fn report_as_operator(pool: &PgPool, name: &str) -> String {
    let (_, token) = common::signed_in(pool, UserRole::Operator, "R. Ncube").await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/downtimes",
        report(name),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

async fn equipment_status(pool: &PgPool, name: &str) -> &'static str {
    EquipmentRepo::find_by_name(pool, name)
        .await
        .unwrap()
        .unwrap()
        .status()
        .unwrap()
        .as_str()
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_opens_event_and_takes_machine_down(pool: PgPool) {
    let (user, token) = common::signed_in(&pool, UserRole::Operator, "R. Ncube").await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(app, "/api/v1/downtimes", report("lhd 201"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["status"], "open");
    assert_eq!(data["equipment_slug"], "lhd-201");
    assert_eq!(data["reported_by"], "R. Ncube");
    assert_eq!(data["cause_label"], "Hydraulic");
    assert!(data["equipment_id"].is_string());
    assert!(data.get("end_time").is_none());

    assert_eq!(equipment_status(&pool, "LHD 201").await, "down");

    let (reporter,): (Option<i64>,) =
        sqlx::query_as("SELECT reported_by_user_id FROM downtime_events LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(reporter, Some(user.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_for_unregistered_machine_is_unlinked(pool: PgPool) {
    let token = token_for(&pool, UserRole::Operator).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "equipment_name": "Loader 999",
        "description": "Will not start",
        "cause": "electrical",
    });
    let response = post_json_auth(app, "/api/v1/downtimes", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"].get("equipment_id").is_none());
    assert_eq!(json["data"]["equipment_type"], "Unknown");
    assert_eq!(json["data"]["section"], "Unknown");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_rejects_unknown_cause(pool: PgPool) {
    let token = token_for(&pool, UserRole::Operator).await;
    let app = common::build_test_app(pool);

    let mut body = report("LHD 201");
    body["cause"] = "gremlins".into();
    let response = post_json_auth(app, "/api/v1/downtimes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_repair_lifecycle(pool: PgPool) {
    let id = report_as_operator(&pool, "LHD 202").await;
    let token = token_for(&pool, UserRole::Maintenance).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/downtimes/{id}/start-repair"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(equipment_status(&pool, "LHD 202").await, "under_repair");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/downtimes/{id}/close"),
        serde_json::json!({ "root_cause": "Worn seal", "repair_notes": "Replaced seal kit" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "closed");
    assert_eq!(json["data"]["root_cause"], "Worn seal");
    assert!(json["data"]["end_time"].is_string());
    assert!(json["data"]["repair_hours"].as_f64().unwrap() >= 0.0);
    assert_eq!(equipment_status(&pool, "LHD 202").await, "running");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cannot_close_open_event(pool: PgPool) {
    let id = report_as_operator(&pool, "LHD 203").await;
    let token = token_for(&pool, UserRole::Engineer).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/downtimes/{id}/close"),
        serde_json::json!({ "root_cause": "Skipped repair" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_close_requires_root_cause(pool: PgPool) {
    let id = report_as_operator(&pool, "LHD 203").await;
    let token = token_for(&pool, UserRole::Engineer).await;

    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/downtimes/{id}/start-repair"),
        serde_json::json!({}),
        &token,
    )
    .await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/downtimes/{id}/close"),
        serde_json::json!({ "root_cause": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_start_repair_twice_is_rejected(pool: PgPool) {
    let id = report_as_operator(&pool, "Bolter 301").await;
    let token = token_for(&pool, UserRole::Maintenance).await;
    let uri = format!("/api/v1/downtimes/{id}/start-repair");

    let first = post_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json_auth(common::build_test_app(pool), &uri, serde_json::json!({}), &token).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_supervisor_cannot_start_repair(pool: PgPool) {
    let id = report_as_operator(&pool, "LHD 201").await;
    let token = token_for(&pool, UserRole::Supervisor).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/downtimes/{id}/start-repair"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_active_and_closed(pool: PgPool) {
    let open_id = report_as_operator(&pool, "LHD 201").await;
    let closed_id = report_as_operator(&pool, "LHD 202").await;
    let token = token_for(&pool, UserRole::Admin).await;

    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/downtimes/{closed_id}/start-repair"),
        serde_json::json!({}),
        &token,
    )
    .await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/downtimes/{closed_id}/close"),
        serde_json::json!({ "root_cause": "Loose connector" }),
        &token,
    )
    .await;

    let all = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/v1/downtimes", &token).await,
    )
    .await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let active = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/downtimes?status=active",
            &token,
        )
        .await,
    )
    .await;
    let active = active["data"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], open_id.as_str());

    let closed = body_json(
        get_auth(
            common::build_test_app(pool),
            "/api/v1/downtimes?status=closed",
            &token,
        )
        .await,
    )
    .await;
    let closed = closed["data"].as_array().unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0]["id"], closed_id.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_active_downtime_for_reported_machine(pool: PgPool) {
    let event_id = report_as_operator(&pool, "Truck 401").await;
    let equipment = EquipmentRepo::find_by_name(&pool, "Truck 401")
        .await
        .unwrap()
        .unwrap();
    let token = token_for(&pool, UserRole::Operator).await;

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/equipment/{}/active-downtime", equipment.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], event_id.as_str());
    assert_eq!(json["data"]["status"], "open");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_downtime_is_404(pool: PgPool) {
    let token = token_for(&pool, UserRole::Admin).await;
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/downtimes/424242",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_status_filter_returns_json_error(pool: PgPool) {
    let token = token_for(&pool, UserRole::Admin).await;
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/downtimes?status=pending",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
