//! Shared fixtures for integration tests.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use tripkit::adapters::legacy::JsonFileLegacyStore;
use tripkit::adapters::sqlite::{
    create_migrated_test_pool, SqliteInteractionRepository, SqliteUserDataRepository,
};
use tripkit::domain::models::Config;
use tripkit::services::UserDataService;

pub type TestService =
    UserDataService<SqliteUserDataRepository, JsonFileLegacyStore, SqliteInteractionRepository>;

/// Service over an in-memory migrated database and a temp legacy directory.
/// The `TempDir` must be kept alive for the duration of the test.
#[allow(dead_code)]
pub async fn test_service() -> (TestService, TempDir) {
    test_service_with_config(Config::default()).await
}

#[allow(dead_code)]
pub async fn test_service_with_config(config: Config) -> (TestService, TempDir) {
    let legacy_dir = tempfile::tempdir().expect("failed to create temp dir");
    let service = service_over(legacy_dir.path(), &config).await;
    (service, legacy_dir)
}

pub async fn service_over(legacy_dir: &Path, config: &Config) -> TestService {
    let pool = create_migrated_test_pool()
        .await
        .expect("failed to create test database");
    let repo = Arc::new(SqliteUserDataRepository::new(pool.clone()));
    let interactions = Arc::new(SqliteInteractionRepository::new(pool));
    let legacy = Arc::new(JsonFileLegacyStore::new(legacy_dir));
    UserDataService::new(repo, legacy, interactions, config)
}

/// Drop a legacy profile blob for `user_id` into the legacy directory.
#[allow(dead_code)]
pub fn write_legacy_blob(dir: &Path, user_id: &str, blob: &serde_json::Value) {
    let path = dir.join(format!("{user_id}.json"));
    std::fs::write(path, serde_json::to_vec_pretty(blob).expect("serialize blob"))
        .expect("failed to write legacy blob");
}
