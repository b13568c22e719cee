//! Config-driven field validation.
//!
//! Rules come from destination configuration, never from screen code. A
//! failed rule is a normal result carrying its configured severity, not an
//! error: `Severity::Error` blocks submission-readiness, `Severity::Warning`
//! is surfaced but non-blocking.

use chrono::{Datelike, Months, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::domain::models::{FieldKey, FieldRule, RuleSpec, Severity, ValueFormat};

/// Maximum plausible traveler age, in years.
const MAX_AGE_YEARS: i32 = 150;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{4,18}[0-9]$").unwrap())
}

/// Outcome of checking one value against one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidation {
    pub valid: bool,
    pub severity: Severity,
    pub message: Option<String>,
}

impl FieldValidation {
    fn ok(severity: Severity) -> Self {
        Self { valid: true, severity, message: None }
    }

    fn fail(severity: Severity, message: impl Into<String>) -> Self {
        Self { valid: false, severity, message: Some(message.into()) }
    }

    /// True when this outcome blocks submission-readiness.
    pub fn blocks_submission(&self) -> bool {
        !self.valid && self.severity == Severity::Error
    }
}

/// Reference dates the date rules evaluate against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub today: NaiveDate,
    /// Planned travel date, used by `MinMonthsValid`. Falls back to `today`
    /// when the trip date is not yet known.
    pub trip_date: Option<NaiveDate>,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            today: Utc::now().date_naive(),
            trip_date: None,
        }
    }
}

/// Check one value against one configured rule.
pub fn validate_field(
    field_key: &FieldKey,
    value: &str,
    spec: &RuleSpec,
    ctx: &ValidationContext,
) -> FieldValidation {
    let severity = spec.severity;
    let trimmed = value.trim();

    // Apart from Required, rules pass vacuously on empty input; emptiness is
    // Required's job and completion scoring's job.
    if trimmed.is_empty() && !matches!(spec.rule, FieldRule::Required) {
        return FieldValidation::ok(severity);
    }

    match &spec.rule {
        FieldRule::Required => {
            if trimmed.is_empty() {
                FieldValidation::fail(severity, format!("{field_key} is required"))
            } else {
                FieldValidation::ok(severity)
            }
        }
        FieldRule::Pattern { pattern } => match Regex::new(pattern) {
            Ok(re) if re.is_match(trimmed) => FieldValidation::ok(severity),
            Ok(_) => FieldValidation::fail(severity, format!("{field_key} has an invalid format")),
            Err(_) => {
                tracing::warn!(field = %field_key, pattern, "misconfigured validation pattern");
                FieldValidation::ok(severity)
            }
        },
        FieldRule::Format { format } => {
            let (re, label) = match format {
                ValueFormat::Email => (email_regex(), "email address"),
                ValueFormat::Phone => (phone_regex(), "phone number"),
            };
            if re.is_match(trimmed) {
                FieldValidation::ok(severity)
            } else {
                FieldValidation::fail(severity, format!("{field_key} is not a valid {label}"))
            }
        }
        FieldRule::MaxLength { max } => {
            if trimmed.chars().count() > *max {
                FieldValidation::fail(severity, format!("{field_key} must be at most {max} characters"))
            } else {
                FieldValidation::ok(severity)
            }
        }
        FieldRule::FutureOnly => match parse_strict_date(trimmed) {
            Ok(date) if date > ctx.today => FieldValidation::ok(severity),
            Ok(_) => FieldValidation::fail(severity, format!("{field_key} must be in the future")),
            Err(e) => FieldValidation::fail(severity, e.to_string()),
        },
        FieldRule::PastOnly => match parse_strict_date(trimmed) {
            Ok(date) if date <= ctx.today => FieldValidation::ok(severity),
            Ok(_) => FieldValidation::fail(severity, format!("{field_key} must not be in the future")),
            Err(e) => FieldValidation::fail(severity, e.to_string()),
        },
        FieldRule::MinMonthsValid { months } => match parse_strict_date(trimmed) {
            Ok(date) => {
                let reference = ctx.trip_date.unwrap_or(ctx.today);
                let required = reference
                    .checked_add_months(Months::new(*months))
                    .unwrap_or(reference);
                if date >= required {
                    FieldValidation::ok(severity)
                } else {
                    FieldValidation::fail(
                        severity,
                        format!("{field_key} must remain valid at least {months} months past the travel date"),
                    )
                }
            }
            Err(e) => FieldValidation::fail(severity, e.to_string()),
        },
        FieldRule::NumericRange { min, max } => match trimmed.parse::<f64>() {
            Ok(n) if n >= *min && n <= *max => FieldValidation::ok(severity),
            Ok(_) => FieldValidation::fail(severity, format!("{field_key} must be between {min} and {max}")),
            Err(_) => FieldValidation::fail(severity, format!("{field_key} must be a number")),
        },
    }
}

/// Check one value against every configured rule; returns only the failures.
pub fn validate_field_rules(
    field_key: &FieldKey,
    value: &str,
    rules: &[RuleSpec],
    ctx: &ValidationContext,
) -> Vec<FieldValidation> {
    rules
        .iter()
        .map(|spec| validate_field(field_key, value, spec, ctx))
        .filter(|outcome| !outcome.valid)
        .collect()
}

/// Date-of-birth constraint violations, one variant per constraint so the UI
/// can show which rule was broken instead of a generic "invalid date".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Date is incomplete: expected YYYY-MM-DD")]
    IncompleteFormat,
    #[error("Year must be four digits")]
    InvalidYear,
    #[error("Month must be between 1 and 12")]
    MonthOutOfRange,
    #[error("Day is out of range for that month")]
    DayOutOfRange,
    #[error("Date of birth cannot be in the future")]
    InFuture,
    #[error("Age cannot exceed {MAX_AGE_YEARS} years")]
    AgeExceedsLimit,
}

/// Strict `YYYY-MM-DD` parse with per-constraint errors.
///
/// Leap years are handled by delegating the day check to chrono after the
/// month check has passed, so `2024-02-29` parses and `2023-02-29` reports
/// `DayOutOfRange`.
pub fn parse_strict_date(value: &str) -> Result<NaiveDate, DateError> {
    let mut parts = value.trim().splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DateError::IncompleteFormat);
    };

    if y.len() != 4 || !y.chars().all(|c| c.is_ascii_digit()) {
        return Err(DateError::InvalidYear);
    }
    if m.is_empty() || d.is_empty() || !m.chars().all(|c| c.is_ascii_digit()) || !d.chars().all(|c| c.is_ascii_digit()) {
        return Err(DateError::IncompleteFormat);
    }

    let year: i32 = y.parse().map_err(|_| DateError::InvalidYear)?;
    let month: u32 = m.parse().map_err(|_| DateError::IncompleteFormat)?;
    let day: u32 = d.parse().map_err(|_| DateError::IncompleteFormat)?;

    if !(1..=12).contains(&month) {
        return Err(DateError::MonthOutOfRange);
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::DayOutOfRange)
}

/// Full date-of-birth validation: strict format plus not-in-future and
/// maximum-age constraints relative to `today`.
pub fn validate_date_of_birth(value: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let date = parse_strict_date(value)?;

    if date > today {
        return Err(DateError::InFuture);
    }

    // A Feb 29 `today` has no counterpart in a non-leap target year; clamp
    // to Feb 28 so the cap still applies.
    let target_year = today.year() - MAX_AGE_YEARS;
    let oldest = NaiveDate::from_ymd_opt(target_year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(target_year, 2, 28))
        .unwrap_or(NaiveDate::MIN);
    if date < oldest {
        return Err(DateError::AgeExceedsLimit);
    }

    Ok(date)
}
