//! Legacy migration integration tests: one-shot semantics, authorship of
//! migrated values, and interaction with clearing saved data.

mod common;

use serde_json::json;

use tripkit::domain::models::{PassportUpdate, PersonalInfoUpdate, UserId};
use tripkit::MigrationOutcome;

use common::{test_service, write_legacy_blob};

fn legacy_profile() -> serde_json::Value {
    json!({
        "passport": {
            "fullName": "Ada Lovelace",
            "passportNo": "E7654321",
            "nationality": "GBR"
        },
        "personal": {
            "phone": "+44 20 7946 0958",
            "country": "United Kingdom"
        },
        "funds": [
            {"type": "cash", "amount": 800.0, "currency": "GBP"},
            {"type": "mystery_asset", "note": "unknown kind"}
        ],
        "travel": {
            "thailand": {"arrivalDate": "2026-12-01"}
        }
    })
}

#[tokio::test]
async fn migration_runs_exactly_once() {
    let (service, legacy_dir) = test_service().await;
    let user = UserId::from("migrant");
    write_legacy_blob(legacy_dir.path(), "migrant", &legacy_profile());

    let first = service.migrate_from_legacy_store(&user).await.unwrap();
    assert_eq!(first, MigrationOutcome { migrated: true });

    let second = service.migrate_from_legacy_store(&user).await.unwrap();
    assert_eq!(second, MigrationOutcome { migrated: false });
}

#[tokio::test]
async fn migrated_data_lands_in_the_structured_store() {
    let (service, legacy_dir) = test_service().await;
    let user = UserId::from("migrant");
    write_legacy_blob(legacy_dir.path(), "migrant", &legacy_profile());

    let snapshot = service.initialize(&user).await.unwrap();

    let passport = snapshot.passport.unwrap();
    assert_eq!(passport.full_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(passport.passport_number.as_deref(), Some("E7654321"));

    let personal = snapshot.personal_info.unwrap();
    assert_eq!(personal.phone_number.as_deref(), Some("+44 20 7946 0958"));
    assert_eq!(personal.country_region.as_deref(), Some("United Kingdom"));

    assert_eq!(snapshot.funds.len(), 2);
    assert_eq!(snapshot.travel["thailand"].field("arrivalDate"), Some("2026-12-01"));
}

#[tokio::test]
async fn migrated_values_count_as_user_authored() {
    let (service, legacy_dir) = test_service().await;
    let user = UserId::from("migrant");
    write_legacy_blob(
        legacy_dir.path(),
        "migrant",
        &json!({
            "passport": {"nationality": "GBR"},
            "personal": {"country": "United Kingdom"}
        }),
    );

    service.initialize(&user).await.unwrap();

    // countryRegion came from the old app, typed by the user; prefill from
    // nationality must not replace it
    assert!(!service.prefill_personal_defaults(&user).await.unwrap());
    let snapshot = service.get_all_user_data(&user, true).await.unwrap();
    assert_eq!(
        snapshot.personal_info.unwrap().country_region.as_deref(),
        Some("United Kingdom")
    );
}

#[tokio::test]
async fn user_without_legacy_data_initializes_cleanly() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("fresh");

    let snapshot = service.initialize(&user).await.unwrap();
    assert!(snapshot.passport.is_none());
    assert!(snapshot.funds.is_empty());

    // The absence was recorded; nothing to migrate later either
    let outcome = service.migrate_from_legacy_store(&user).await.unwrap();
    assert_eq!(outcome, MigrationOutcome { migrated: false });
}

#[tokio::test]
async fn clearing_saved_data_does_not_resurrect_legacy_data() {
    let (service, legacy_dir) = test_service().await;
    let user = UserId::from("migrant");
    write_legacy_blob(legacy_dir.path(), "migrant", &legacy_profile());

    service.initialize(&user).await.unwrap();
    service.clear_saved_data(&user).await.unwrap();

    // The blob is still on disk, but the migration marker survives the clear
    let snapshot = service.initialize(&user).await.unwrap();
    assert!(snapshot.passport.is_none());
    assert!(snapshot.funds.is_empty());
}

#[tokio::test]
async fn corrupt_legacy_blob_does_not_block_initialize() {
    let (service, legacy_dir) = test_service().await;
    let user = UserId::from("migrant");
    std::fs::write(legacy_dir.path().join("migrant.json"), "{not json at all").unwrap();

    // Initialize succeeds; the user just starts with structured data only
    let snapshot = service.initialize(&user).await.unwrap();
    assert!(snapshot.passport.is_none());

    // The marker was not written, so a later (fixed) blob can still migrate
    write_legacy_blob(legacy_dir.path(), "migrant", &legacy_profile());
    let outcome = service.migrate_from_legacy_store(&user).await.unwrap();
    assert_eq!(outcome, MigrationOutcome { migrated: true });
}

#[tokio::test]
async fn retried_migration_merges_into_a_passport_captured_meanwhile() {
    let (service, legacy_dir) = test_service().await;
    let user = UserId::from("migrant");

    // First launch fails to migrate: the blob is unreadable, no marker
    std::fs::write(legacy_dir.path().join("migrant.json"), "{not json at all").unwrap();
    service.initialize(&user).await.unwrap();

    // The user captures a passport through the normal flow
    let captured = service
        .capture_passport(
            &user,
            PassportUpdate {
                passport_number: Some("X9999999".to_string()),
                ..PassportUpdate::default()
            },
        )
        .await
        .unwrap();

    // The blob is fixed; the retry must merge, not collide with the
    // existing record
    write_legacy_blob(legacy_dir.path(), "migrant", &legacy_profile());
    let outcome = service.migrate_from_legacy_store(&user).await.unwrap();
    assert_eq!(outcome, MigrationOutcome { migrated: true });

    let snapshot = service.get_all_user_data(&user, true).await.unwrap();
    let passport = snapshot.passport.unwrap();
    assert_eq!(passport.id, captured.id);
    assert_eq!(passport.full_name.as_deref(), Some("Ada Lovelace"));
    // Legacy value wins for fields present in the blob
    assert_eq!(passport.passport_number.as_deref(), Some("E7654321"));
}

#[tokio::test]
async fn migration_does_not_clobber_existing_edits_before_it_runs() {
    let (service, legacy_dir) = test_service().await;
    let user = UserId::from("migrant");

    // Fresh initialize records "nothing to migrate"
    service.initialize(&user).await.unwrap();
    service
        .upsert_personal_info(
            &user,
            PersonalInfoUpdate {
                occupation: Some("Pilot".to_string()),
                ..PersonalInfoUpdate::default()
            },
        )
        .await
        .unwrap();

    // A blob appearing afterwards is ignored: the marker is already set
    write_legacy_blob(legacy_dir.path(), "migrant", &legacy_profile());
    let snapshot = service.initialize(&user).await.unwrap();
    assert_eq!(snapshot.personal_info.unwrap().occupation.as_deref(), Some("Pilot"));
}
