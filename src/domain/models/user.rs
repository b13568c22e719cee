//! User scoping primitives: user ids, entity kinds, and field keys.

use serde::{Deserialize, Serialize};

/// Opaque identifier scoping all persisted and cached data for one traveler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Entity types the store persists and the cache invalidates independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Passport,
    PersonalInfo,
    Travel,
    Funds,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::PersonalInfo => "personalInfo",
            Self::Travel => "travel",
            Self::Funds => "funds",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "passport" => Some(Self::Passport),
            "personalInfo" => Some(Self::PersonalInfo),
            "travel" => Some(Self::Travel),
            "funds" => Some(Self::Funds),
            _ => None,
        }
    }
}

/// Stable identifier for one logical field, combining entity and field name
/// (e.g. `personalInfo.occupation`).
///
/// Field keys are the unit the interaction tracker and the validation rules
/// are keyed by, so their textual form must stay stable across releases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    pub fn new(entity: EntityKind, field: &str) -> Self {
        Self(format!("{}.{}", entity.as_str(), field))
    }

    pub fn passport(field: &str) -> Self {
        Self::new(EntityKind::Passport, field)
    }

    pub fn personal(field: &str) -> Self {
        Self::new(EntityKind::PersonalInfo, field)
    }

    pub fn travel(field: &str) -> Self {
        Self::new(EntityKind::Travel, field)
    }

    /// Parse a raw `entity.field` string; returns None for unknown entities.
    pub fn parse(raw: &str) -> Option<Self> {
        let (entity, field) = raw.split_once('.')?;
        EntityKind::from_str(entity).map(|kind| Self::new(kind, field))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The entity portion of the key.
    pub fn entity(&self) -> Option<EntityKind> {
        self.0.split_once('.').and_then(|(e, _)| EntityKind::from_str(e))
    }

    /// The field-name portion of the key.
    pub fn field(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(_, f)| f)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_key_round_trips_entity_and_field() {
        let key = FieldKey::personal("occupation");
        assert_eq!(key.as_str(), "personalInfo.occupation");
        assert_eq!(key.entity(), Some(EntityKind::PersonalInfo));
        assert_eq!(key.field(), "occupation");
    }

    #[test]
    fn parse_rejects_unknown_entity() {
        assert!(FieldKey::parse("bogus.field").is_none());
        assert!(FieldKey::parse("passport.expiryDate").is_some());
    }
}
