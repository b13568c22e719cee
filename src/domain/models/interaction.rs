//! Field interaction record.
//!
//! Tracks, per user and per logical field, whether the current value was
//! typed by the user or proposed by the system. Not re-derivable from the
//! value itself, so it shares the store's durability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{FieldKey, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInteractionRecord {
    pub user_id: UserId,
    pub field_key: FieldKey,
    pub is_user_authored: bool,
    pub last_touched_at: DateTime<Utc>,
}

impl FieldInteractionRecord {
    /// Record a deliberate user edit.
    pub fn user_authored(user_id: UserId, field_key: FieldKey) -> Self {
        Self {
            user_id,
            field_key,
            is_user_authored: true,
            last_touched_at: Utc::now(),
        }
    }

    /// Record a system-proposed default.
    pub fn pre_filled(user_id: UserId, field_key: FieldKey) -> Self {
        Self {
            user_id,
            field_key,
            is_user_authored: false,
            last_touched_at: Utc::now(),
        }
    }
}
