//! Personal info domain model.
//!
//! One record per user, upserted: created on first write, merged on
//! subsequent writes. `date_of_birth` and `gender` mirror the passport record
//! and are kept consistent by the service when either side is edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub user_id: UserId,
    pub occupation: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub country_region: Option<String>,
    pub province_city: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalInfo {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            occupation: None,
            phone_number: None,
            email: None,
            country_region: None,
            province_city: None,
            date_of_birth: None,
            gender: None,
            updated_at: Utc::now(),
        }
    }

    /// Merge a partial update. `Some` fields replace, `None` are untouched.
    pub fn apply(&mut self, update: PersonalInfoUpdate) {
        if let Some(v) = update.occupation {
            self.occupation = Some(v);
        }
        if let Some(v) = update.phone_number {
            self.phone_number = Some(v);
        }
        if let Some(v) = update.email {
            self.email = Some(v);
        }
        if let Some(v) = update.country_region {
            self.country_region = Some(v);
        }
        if let Some(v) = update.province_city {
            self.province_city = Some(v);
        }
        if let Some(v) = update.date_of_birth {
            self.date_of_birth = Some(v);
        }
        if let Some(v) = update.gender {
            self.gender = Some(v);
        }
        self.updated_at = Utc::now();
    }

    /// Look up a field value by its stable field name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "occupation" => self.occupation.as_deref(),
            "phoneNumber" => self.phone_number.as_deref(),
            "email" => self.email.as_deref(),
            "countryRegion" => self.country_region.as_deref(),
            "provinceCity" => self.province_city.as_deref(),
            "dateOfBirth" => self.date_of_birth.as_deref(),
            "gender" => self.gender.as_deref(),
            _ => None,
        }
    }
}

/// Partial personal-info update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfoUpdate {
    pub occupation: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub country_region: Option<String>,
    pub province_city: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
}

impl PersonalInfoUpdate {
    /// Build an update that sets a single named field. Returns None for
    /// unknown field names.
    pub fn for_field(name: &str, value: String) -> Option<Self> {
        let mut update = Self::default();
        match name {
            "occupation" => update.occupation = Some(value),
            "phoneNumber" => update.phone_number = Some(value),
            "email" => update.email = Some(value),
            "countryRegion" => update.country_region = Some(value),
            "provinceCity" => update.province_city = Some(value),
            "dateOfBirth" => update.date_of_birth = Some(value),
            "gender" => update.gender = Some(value),
            _ => return None,
        }
        Some(update)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
