//! Domain models for the traveler profile.

pub mod completion;
pub mod config;
pub mod destination;
pub mod fund;
pub mod interaction;
pub mod passport;
pub mod personal;
pub mod snapshot;
pub mod travel;
pub mod user;

pub use completion::{CategoryCompletion, CompletionSnapshot, CompletionState};
pub use config::{AutosaveConfig, Config, DatabaseConfig, LegacyConfig, LoggingConfig};
pub use destination::{
    Category, DestinationConfig, FieldDescriptor, FieldRule, RuleSpec, Severity, ValueFormat,
};
pub use fund::{FundItem, FundItemType, FundItemUpdate};
pub use interaction::FieldInteractionRecord;
pub use passport::{PassportRecord, PassportUpdate, SerializablePassport};
pub use personal::{PersonalInfo, PersonalInfoUpdate};
pub use snapshot::UserDataSnapshot;
pub use travel::TravelInfo;
pub use user::{EntityKind, FieldKey, UserId};
