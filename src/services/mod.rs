//! Service layer: business logic over the repository ports.

pub mod autosave;
pub mod completion;
pub mod interaction_tracker;
pub mod migration_runner;
pub mod user_data_service;
pub mod validation;

pub use autosave::AutosaveScheduler;
pub use completion::compute_completion;
pub use interaction_tracker::InteractionTracker;
pub use migration_runner::{MigrationOutcome, MigrationRunner};
pub use user_data_service::UserDataService;
pub use validation::{
    parse_strict_date, validate_date_of_birth, validate_field, validate_field_rules,
    DateError, FieldValidation, ValidationContext,
};
