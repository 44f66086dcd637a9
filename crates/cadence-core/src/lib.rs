//! # Cadence Core Library
//!
//! Recurrence rules for recurring tasks: a rule describes how a task repeats
//! (daily, weekly on chosen weekdays, monthly by date or by ordinal weekday,
//! yearly) and when it stops; the engine turns it into concrete dates.
//!
//! ## Core Modules
//!
//! - [`models`]: Rule descriptor, end conditions and occurrences
//! - [`recurrence`]: Expansion engine and human-readable descriptions
//! - [`validation`]: Field-level checks for user-authored rules
//! - [`codec`]: Delimited `key:value` storage format
//! - [`error`]: Error types
//!
//! The engine never reads the clock. Every date it works with comes from the
//! rule or from the caller.
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use cadence_core::models::{EndCondition, Pattern, RecurrenceRule};
//! use cadence_core::{recurrence, validation};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let rule = RecurrenceRule::new(Pattern::Weekly, start)
//!     .with_title("Standup")
//!     .with_days_of_week([1, 3, 5])
//!     .with_end(EndCondition::AfterOccurrences(10));
//!
//! assert!(validation::validate(&rule).is_valid());
//!
//! let dates = recurrence::expand(&rule, 5).unwrap();
//! assert_eq!(dates.len(), 5);
//! assert_eq!(dates[0].at, start);
//! ```

pub mod codec;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod validation;

pub use error::CoreError;
pub use models::{EndCondition, MonthlyRule, Occurrence, Pattern, RecurrenceRule};
pub use recurrence::{expand, ExpansionConfig, RecurrenceEngine};
pub use validation::{validate, FieldError, ValidationResult};
