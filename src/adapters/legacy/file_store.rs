//! Legacy blob reader backed by per-user JSON dump files.
//!
//! Earlier app versions persisted one unstructured key-value JSON blob per
//! user. This adapter only reads; migration is one-directional and the
//! structured store never writes back here.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::errors::{UserDataError, UserDataResult};
use crate::domain::models::UserId;
use crate::domain::ports::LegacyStore;

pub struct JsonFileLegacyStore {
    dir: PathBuf,
}

impl JsonFileLegacyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn blob_path(&self, user_id: &UserId) -> PathBuf {
        self.dir.join(format!("{}.json", user_id.as_str()))
    }
}

#[async_trait]
impl LegacyStore for JsonFileLegacyStore {
    async fn read_legacy_blob(&self, user_id: &UserId) -> UserDataResult<Option<serde_json::Value>> {
        let path = self.blob_path(user_id);
        if !path.exists() {
            return Ok(None);
        }

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| UserDataError::StoreUnavailable(format!("legacy read failed: {e}")))?;

        let value = serde_json::from_str(&raw)?;
        Ok(Some(value))
    }
}
