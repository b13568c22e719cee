//! End-to-end tests of the user data service over a real (in-memory)
//! database: cache coherence after writes, fund item isolation, field edit
//! routing, and clearing saved data.

mod common;

use std::collections::HashMap;

use tripkit::domain::models::{
    EntityKind, FundItemType, FundItemUpdate, PassportUpdate, PersonalInfoUpdate, UserId,
};
use tripkit::UserDataError;

use common::test_service;

#[tokio::test]
async fn snapshot_stays_coherent_after_writes_without_force_refresh() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    let update = PersonalInfoUpdate {
        occupation: Some("Engineer".to_string()),
        ..PersonalInfoUpdate::default()
    };
    service.upsert_personal_info(&user, update).await.unwrap();

    // A cached read must already see the write
    let snapshot = service.get_all_user_data(&user, false).await.unwrap();
    assert_eq!(
        snapshot.personal_info.unwrap().occupation.as_deref(),
        Some("Engineer")
    );
}

#[tokio::test]
async fn passport_capture_never_duplicates() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    let first = service
        .capture_passport(
            &user,
            PassportUpdate {
                passport_number: Some("E1234567".to_string()),
                ..PassportUpdate::default()
            },
        )
        .await
        .unwrap();

    let second = service
        .capture_passport(
            &user,
            PassportUpdate {
                nationality: Some("THA".to_string()),
                ..PassportUpdate::default()
            },
        )
        .await
        .unwrap();

    // Same record, merged fields
    assert_eq!(first.id, second.id);
    assert_eq!(second.passport_number.as_deref(), Some("E1234567"));
    assert_eq!(second.nationality.as_deref(), Some("THA"));
}

#[tokio::test]
async fn passport_update_validates_dates_unless_skipped() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    let passport = service
        .capture_passport(&user, PassportUpdate::default())
        .await
        .unwrap();

    let bad_dob = PassportUpdate {
        date_of_birth: Some("2999-01-01".to_string()),
        ..PassportUpdate::default()
    };
    let err = service
        .update_passport(passport.id, bad_dob.clone(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, UserDataError::ValidationFailed(_)));

    // OCR-style capture path can skip validation and store the raw value
    let stored = service.update_passport(passport.id, bad_dob, true).await.unwrap();
    assert_eq!(stored.date_of_birth.as_deref(), Some("2999-01-01"));
}

#[tokio::test]
async fn updating_missing_passport_reports_not_found() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    let err = service
        .update_passport(uuid::Uuid::new_v4(), PassportUpdate::default(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, UserDataError::PassportNotFound(_)));
}

#[tokio::test]
async fn dob_edit_mirrors_between_passport_and_personal_info() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    service
        .capture_passport(&user, PassportUpdate::default())
        .await
        .unwrap();

    // dateOfBirth is an immediate field, so the write lands synchronously
    service
        .edit_personal_field(&user, "dateOfBirth", "1990-06-15".to_string())
        .await
        .unwrap();

    let snapshot = service.get_all_user_data(&user, true).await.unwrap();
    assert_eq!(
        snapshot.personal_info.unwrap().date_of_birth.as_deref(),
        Some("1990-06-15")
    );
    assert_eq!(
        snapshot.passport.unwrap().date_of_birth.as_deref(),
        Some("1990-06-15")
    );
}

#[tokio::test]
async fn deleting_one_fund_item_leaves_the_rest() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    let cash = service
        .add_fund_item(&user, FundItemType::Cash, FundItemUpdate::default())
        .await
        .unwrap();
    let card = service
        .add_fund_item(&user, FundItemType::BankCard, FundItemUpdate::default())
        .await
        .unwrap();

    service.delete_fund_item(cash.id).await.unwrap();

    let remaining = service.get_fund_items(&user, false).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, card.id);

    // Deleting again reports the missing item
    let err = service.delete_fund_item(cash.id).await.unwrap_err();
    assert!(matches!(err, UserDataError::FundItemNotFound(_)));
}

#[tokio::test]
async fn fund_items_are_isolated_per_user() {
    let (service, _legacy) = test_service().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    service.initialize(&alice).await.unwrap();
    service.initialize(&bob).await.unwrap();

    service
        .add_fund_item(&alice, FundItemType::Cash, FundItemUpdate::default())
        .await
        .unwrap();

    assert_eq!(service.get_fund_items(&alice, true).await.unwrap().len(), 1);
    assert!(service.get_fund_items(&bob, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn travel_info_merges_per_destination() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    let mut first = HashMap::new();
    first.insert("arrivalDate".to_string(), "2026-12-01".to_string());
    service.update_travel_info(&user, "thailand", first).await.unwrap();

    let mut second = HashMap::new();
    second.insert("flightNumber".to_string(), "TG917".to_string());
    service.update_travel_info(&user, "thailand", second).await.unwrap();

    let snapshot = service.get_all_user_data(&user, true).await.unwrap();
    let travel = &snapshot.travel["thailand"];
    assert_eq!(travel.field("arrivalDate"), Some("2026-12-01"));
    assert_eq!(travel.field("flightNumber"), Some("TG917"));
}

#[tokio::test]
async fn prefill_respects_user_authored_fields() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    service
        .capture_passport(
            &user,
            PassportUpdate {
                nationality: Some("Japan".to_string()),
                ..PassportUpdate::default()
            },
        )
        .await
        .unwrap();

    // First prefill infers country of residence from nationality
    assert!(service.prefill_personal_defaults(&user).await.unwrap());
    let snapshot = service.get_all_user_data(&user, false).await.unwrap();
    assert_eq!(
        snapshot.personal_info.unwrap().country_region.as_deref(),
        Some("Japan")
    );

    // The user overrides it; a later prefill must not touch it
    service
        .edit_personal_field(&user, "countryRegion", "Singapore".to_string())
        .await
        .unwrap();
    tokio::time::sleep(service.debounce_window() * 2).await;

    assert!(!service.prefill_personal_defaults(&user).await.unwrap());
    let snapshot = service.get_all_user_data(&user, true).await.unwrap();
    assert_eq!(
        snapshot.personal_info.unwrap().country_region.as_deref(),
        Some("Singapore")
    );
}

#[tokio::test]
async fn clear_saved_data_wipes_every_entity() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    service
        .capture_passport(
            &user,
            PassportUpdate {
                passport_number: Some("E1234567".to_string()),
                ..PassportUpdate::default()
            },
        )
        .await
        .unwrap();
    service
        .add_fund_item(&user, FundItemType::Cash, FundItemUpdate::default())
        .await
        .unwrap();
    let mut fields = HashMap::new();
    fields.insert("arrivalDate".to_string(), "2026-12-01".to_string());
    service.update_travel_info(&user, "thailand", fields).await.unwrap();

    service.clear_saved_data(&user).await.unwrap();

    let snapshot = service.get_all_user_data(&user, true).await.unwrap();
    assert!(snapshot.passport.is_none());
    assert!(snapshot.personal_info.is_none());
    assert!(snapshot.funds.is_empty());
    assert!(snapshot.travel.is_empty());
}

#[tokio::test]
async fn invalidated_slice_reloads_from_store() {
    let (service, _legacy) = test_service().await;
    let user = UserId::from("traveler-1");
    service.initialize(&user).await.unwrap();

    service
        .add_fund_item(&user, FundItemType::Document, FundItemUpdate::default())
        .await
        .unwrap();

    service.invalidate_cache(EntityKind::Funds, &user).await;
    let funds = service.get_fund_items(&user, false).await.unwrap();
    assert_eq!(funds.len(), 1);
}
