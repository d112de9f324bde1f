//! Integration tests for the downtime repository and its equipment side
//! effects.

use minetrack_core::downtime::{equipment_slug, DowntimeCause, DowntimeStatus};
use minetrack_core::equipment::EquipmentStatus;
use minetrack_db::models::downtime::{CreateDowntimeEvent, DowntimeFilter};
use minetrack_db::models::equipment::{CreateEquipment, UpdateEquipment};
use minetrack_db::repositories::{DowntimeRepo, EquipmentRepo};
use sqlx::PgPool;

fn report(name: &str, cause: DowntimeCause) -> CreateDowntimeEvent {
    CreateDowntimeEvent {
        equipment_slug: equipment_slug(name),
        equipment_name: name.to_string(),
        equipment_type: "LHD".to_string(),
        section: "Canaan".to_string(),
        reported_by: "Test Operator".to_string(),
        reported_by_user_id: None,
        description: "Won't start".to_string(),
        cause,
    }
}

async fn equipment_status(pool: &PgPool, name: &str) -> EquipmentStatus {
    EquipmentRepo::find_by_name(pool, name)
        .await
        .unwrap()
        .and_then(|e| e.status())
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_lifecycle_moves_equipment_status(pool: PgPool) {
    let event = DowntimeRepo::create(&pool, &report("lhd 201", DowntimeCause::Electrical))
        .await
        .unwrap();
    assert_eq!(event.status(), Some(DowntimeStatus::Open));
    assert!(event.equipment_id.is_some());
    assert_eq!(equipment_status(&pool, "LHD 201").await, EquipmentStatus::Down);

    let event = DowntimeRepo::start_repair(&pool, event.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.status(), Some(DowntimeStatus::InProgress));
    assert_eq!(equipment_status(&pool, "LHD 201").await, EquipmentStatus::UnderRepair);

    let event = DowntimeRepo::close(&pool, event.id, " Starter relay ", Some(""))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.status(), Some(DowntimeStatus::Closed));
    assert_eq!(event.root_cause.as_deref(), Some("Starter relay"));
    assert!(event.repair_notes.is_none());
    assert!(event.end_time.unwrap() >= event.start_time);
    assert_eq!(equipment_status(&pool, "LHD 201").await, EquipmentStatus::Running);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_order_transitions_return_none(pool: PgPool) {
    let event = DowntimeRepo::create(&pool, &report("Bolter 301", DowntimeCause::Mechanical))
        .await
        .unwrap();

    // Cannot close an event that was never started.
    let closed = DowntimeRepo::close(&pool, event.id, "n/a", None).await.unwrap();
    assert!(closed.is_none());

    DowntimeRepo::start_repair(&pool, event.id).await.unwrap().unwrap();
    // Cannot start twice.
    assert!(DowntimeRepo::start_repair(&pool, event.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unregistered_equipment_is_accepted(pool: PgPool) {
    let event = DowntimeRepo::create(&pool, &report("Loader X", DowntimeCause::Other))
        .await
        .unwrap();
    assert!(event.equipment_id.is_none());
    assert_eq!(event.equipment_slug, "loader-x");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_active_lookup(pool: PgPool) {
    let first = DowntimeRepo::create(&pool, &report("LHD 202", DowntimeCause::Hydraulic))
        .await
        .unwrap();
    DowntimeRepo::start_repair(&pool, first.id).await.unwrap();
    DowntimeRepo::close(&pool, first.id, "Hose", None).await.unwrap();
    let second = DowntimeRepo::create(&pool, &report("LHD 202", DowntimeCause::Structural))
        .await
        .unwrap();

    let active = DowntimeRepo::list(&pool, Some(DowntimeFilter::Active), 50, 0)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);

    let closed = DowntimeRepo::list(&pool, Some(DowntimeFilter::Closed), 50, 0)
        .await
        .unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id, first.id);

    let all = DowntimeRepo::list(&pool, None, 50, 0).await.unwrap();
    assert_eq!(all.len(), 2);

    let lhd = EquipmentRepo::find_by_name(&pool, "LHD 202").await.unwrap().unwrap();
    let found = DowntimeRepo::find_active_for_equipment(&pool, lhd.id, "lhd 202")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, second.id);
}

async fn rename(pool: &PgPool, from: &str, to: &str) -> i64 {
    let id = EquipmentRepo::find_by_name(pool, from).await.unwrap().unwrap().id;
    let patch = UpdateEquipment {
        name: Some(to.to_string()),
        ..Default::default()
    };
    EquipmentRepo::update(pool, id, &patch).await.unwrap().unwrap();
    id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn renamed_machine_still_follows_its_downtime(pool: PgPool) {
    let event = DowntimeRepo::create(&pool, &report("LHD 201", DowntimeCause::Mechanical))
        .await
        .unwrap();
    let id = rename(&pool, "LHD 201", "LHD 201A").await;
    assert_eq!(event.equipment_id, Some(id));

    DowntimeRepo::start_repair(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(equipment_status(&pool, "LHD 201A").await, EquipmentStatus::UnderRepair);

    let active = DowntimeRepo::find_active_for_equipment(&pool, id, "LHD 201A")
        .await
        .unwrap()
        .expect("linked event is still active after the rename");
    assert_eq!(active.id, event.id);

    DowntimeRepo::close(&pool, event.id, "Fuel filter", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(equipment_status(&pool, "LHD 201A").await, EquipmentStatus::Running);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reused_name_is_not_touched_by_old_downtime(pool: PgPool) {
    let event = DowntimeRepo::create(&pool, &report("Truck 401", DowntimeCause::Electrical))
        .await
        .unwrap();
    rename(&pool, "Truck 401", "Truck 401 (retired)").await;

    let newcomer = EquipmentRepo::create(
        &pool,
        &CreateEquipment {
            name: "Truck 401".to_string(),
            machine_type: "Truck".to_string(),
            section: "Eureka".to_string(),
            location: None,
            status: Some(EquipmentStatus::Idle),
            serial_number: None,
            installation_date: None,
            last_maintenance: None,
        },
    )
    .await
    .unwrap();

    DowntimeRepo::start_repair(&pool, event.id).await.unwrap().unwrap();

    assert_eq!(equipment_status(&pool, "Truck 401").await, EquipmentStatus::Idle);
    assert_eq!(
        equipment_status(&pool, "Truck 401 (retired)").await,
        EquipmentStatus::UnderRepair
    );
    let active = DowntimeRepo::find_active_for_equipment(&pool, newcomer.id, "Truck 401")
        .await
        .unwrap();
    assert!(active.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlinked_event_falls_back_to_name(pool: PgPool) {
    let event = DowntimeRepo::create(&pool, &report("Scaler 701", DowntimeCause::Other))
        .await
        .unwrap();
    assert!(event.equipment_id.is_none());

    let scaler = EquipmentRepo::create(
        &pool,
        &CreateEquipment {
            name: "Scaler 701".to_string(),
            machine_type: "Scaler".to_string(),
            section: "Canaan".to_string(),
            location: None,
            status: None,
            serial_number: None,
            installation_date: None,
            last_maintenance: None,
        },
    )
    .await
    .unwrap();

    let active = DowntimeRepo::find_active_for_equipment(&pool, scaler.id, "scaler 701")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, event.id);

    DowntimeRepo::start_repair(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(equipment_status(&pool, "Scaler 701").await, EquipmentStatus::UnderRepair);
}
