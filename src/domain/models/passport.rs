//! Passport domain model.
//!
//! One active passport record per user. Field-level updates target the
//! existing record by id; a user never accumulates duplicate passports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// The traveler's identity document.
///
/// Dates are stored as entered (`YYYY-MM-DD` text) so the validation engine
/// can report format-level problems on exactly what the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassportRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub expiry_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PassportRecord {
    /// Create an empty passport record for a user.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            full_name: None,
            passport_number: None,
            nationality: None,
            date_of_birth: None,
            gender: None,
            expiry_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this record. `Some` fields replace,
    /// `None` fields are left untouched.
    pub fn apply(&mut self, update: PassportUpdate) {
        if let Some(v) = update.full_name {
            self.full_name = Some(v);
        }
        if let Some(v) = update.passport_number {
            self.passport_number = Some(v);
        }
        if let Some(v) = update.nationality {
            self.nationality = Some(v);
        }
        if let Some(v) = update.date_of_birth {
            self.date_of_birth = Some(v);
        }
        if let Some(v) = update.gender {
            self.gender = Some(v);
        }
        if let Some(v) = update.expiry_date {
            self.expiry_date = Some(v);
        }
        self.updated_at = Utc::now();
    }

    /// Look up a field value by its stable field name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "fullName" => self.full_name.as_deref(),
            "passportNumber" => self.passport_number.as_deref(),
            "nationality" => self.nationality.as_deref(),
            "dateOfBirth" => self.date_of_birth.as_deref(),
            "gender" => self.gender.as_deref(),
            "expiryDate" => self.expiry_date.as_deref(),
            _ => None,
        }
    }
}

/// Partial passport update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassportUpdate {
    pub full_name: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub expiry_date: Option<String>,
}

impl PassportUpdate {
    /// Build an update that sets a single named field. Returns None for
    /// unknown field names.
    pub fn for_field(name: &str, value: String) -> Option<Self> {
        let mut update = Self::default();
        match name {
            "fullName" => update.full_name = Some(value),
            "passportNumber" => update.passport_number = Some(value),
            "nationality" => update.nationality = Some(value),
            "dateOfBirth" => update.date_of_birth = Some(value),
            "gender" => update.gender = Some(value),
            "expiryDate" => update.expiry_date = Some(value),
            _ => return None,
        }
        Some(update)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Passport payload safe to embed in cross-screen navigation params.
///
/// Strips the internal scoping and bookkeeping fields (`user_id`,
/// timestamps) that navigation payloads must not carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializablePassport {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub expiry_date: Option<String>,
}

impl From<&PassportRecord> for SerializablePassport {
    fn from(record: &PassportRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name.clone(),
            passport_number: record.passport_number.clone(),
            nationality: record.nationality.clone(),
            date_of_birth: record.date_of_birth.clone(),
            gender: record.gender.clone(),
            expiry_date: record.expiry_date.clone(),
        }
    }
}
