//! Full per-user data snapshot as returned by `get_all_user_data`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::fund::FundItem;
use super::passport::PassportRecord;
use super::personal::PersonalInfo;
use super::travel::TravelInfo;
use super::user::{EntityKind, FieldKey};

/// Everything the store holds for one user, assembled by the cache layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDataSnapshot {
    pub passport: Option<PassportRecord>,
    pub personal_info: Option<PersonalInfo>,
    pub funds: Vec<FundItem>,
    /// Travel info keyed by destination id.
    pub travel: HashMap<String, TravelInfo>,
}

impl UserDataSnapshot {
    /// Resolve a field key against this snapshot. Travel fields resolve
    /// against the given destination.
    pub fn field_value(&self, key: &FieldKey, destination_id: &str) -> Option<&str> {
        match key.entity()? {
            EntityKind::Passport => self.passport.as_ref()?.field(key.field()),
            EntityKind::PersonalInfo => self.personal_info.as_ref()?.field(key.field()),
            EntityKind::Travel => self.travel.get(destination_id)?.field(key.field()),
            // Funds are counted as items, not addressed as fields
            EntityKind::Funds => None,
        }
    }
}
