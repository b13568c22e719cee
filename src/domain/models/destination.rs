//! Destination configuration: declarative field lists and validation rules.
//!
//! Different destinations require different field sets, so screens never
//! hard-code thresholds; they hand the engine a `DestinationConfig` and the
//! engine stays generic over its field descriptors.

use serde::{Deserialize, Serialize};

use super::user::FieldKey;

/// Completion/validation category a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Passport,
    PersonalInfo,
    Funds,
    Travel,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::PersonalInfo => "personalInfo",
            Self::Funds => "funds",
            Self::Travel => "travel",
        }
    }
}

/// Well-known value formats with built-in patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    Email,
    Phone,
}

/// One validation rule, declared per field in destination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    Required,
    Pattern { pattern: String },
    Format { format: ValueFormat },
    MaxLength { max: usize },
    /// Date must be strictly after the reference date (e.g. arrival date).
    FutureOnly,
    /// Date must be on or before the reference date (e.g. date of birth).
    PastOnly,
    /// Document must remain valid at least this many months past the trip
    /// date (passport validity requirement).
    MinMonthsValid { months: u32 },
    NumericRange { min: f64, max: f64 },
}

/// Whether a rule blocks submission-readiness or is advisory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// A rule plus its configured severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(flatten)]
    pub rule: FieldRule,
    #[serde(default)]
    pub severity: Severity,
}

impl RuleSpec {
    pub fn error(rule: FieldRule) -> Self {
        Self { rule, severity: Severity::Error }
    }

    pub fn warning(rule: FieldRule) -> Self {
        Self { rule, severity: Severity::Warning }
    }
}

/// One field a destination's forms collect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub category: Category,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// Declarative per-destination configuration consumed by the validation and
/// completion engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub destination_id: String,
    pub fields: Vec<FieldDescriptor>,
    /// Minimum number of fund items considered sufficient for this
    /// destination.
    #[serde(default = "default_min_fund_items")]
    pub min_fund_items: usize,
}

fn default_min_fund_items() -> usize {
    3
}

impl DestinationConfig {
    /// Descriptors belonging to one category, in declared order.
    pub fn fields_in_category(&self, category: Category) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(move |f| f.category == category)
    }

    /// Look up the descriptor for a field key.
    pub fn descriptor(&self, key: &FieldKey) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| &f.key == key)
    }
}
