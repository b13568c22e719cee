//! Travel info domain model.
//!
//! One record per (user, destination). Destinations declare different field
//! sets (arrival date, flight numbers, accommodation, length of stay), so
//! values are stored generically as a field-name → value map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelInfo {
    pub user_id: UserId,
    pub destination_id: String,
    pub fields: HashMap<String, String>,
    pub last_edited_at: DateTime<Utc>,
}

impl TravelInfo {
    pub fn new(user_id: UserId, destination_id: impl Into<String>) -> Self {
        Self {
            user_id,
            destination_id: destination_id.into(),
            fields: HashMap::new(),
            last_edited_at: Utc::now(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
        self.last_edited_at = Utc::now();
    }
}
