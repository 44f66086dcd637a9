//! Field-level checks for rules coming from user input.
//!
//! Unlike [`crate::recurrence::check_rule`], which guards the expansion
//! contract and stops at the first problem, [`validate`] never fails and
//! reports every violation so a form can flag each field.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{EndCondition, MonthlyRule, Pattern, RecurrenceRule};
use crate::recurrence::is_valid_ordinal;

/// A single user-facing problem with one field of a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "errors", rename_all = "lowercase")]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    /// Whether `field` has at least one error.
    pub fn has_error(&self, field: &str) -> bool {
        self.errors().iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(CoreError::ValidationFailed(errors)),
        }
    }
}

/// Checks a rule the way the task form does before submission.
pub fn validate(rule: &RecurrenceRule) -> ValidationResult {
    let mut errors = Vec::new();

    if rule.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }

    if rule.interval < 1 {
        errors.push(FieldError::new("interval", "Interval must be at least 1"));
    }

    if rule.pattern == Pattern::Weekly {
        if rule.days_of_week.is_empty() {
            errors.push(FieldError::new(
                "days_of_week",
                "Select at least one day of the week",
            ));
        }
        if rule.days_of_week.iter().any(|&day| day > 6) {
            errors.push(FieldError::new(
                "days_of_week",
                "Days of the week must be between 0 (Sunday) and 6 (Saturday)",
            ));
        }
    }

    if rule.pattern == Pattern::Monthly {
        match rule.effective_monthly() {
            MonthlyRule::ByDate { day } => {
                if !(1..=31).contains(&day) {
                    errors.push(FieldError::new(
                        "monthly_date",
                        "Day of month must be between 1 and 31",
                    ));
                }
            }
            MonthlyRule::ByWeekday { week, weekday } => {
                if !is_valid_ordinal(week) {
                    errors.push(FieldError::new(
                        "monthly_week",
                        "Week must be first through fifth, or last",
                    ));
                }
                if weekday > 6 {
                    errors.push(FieldError::new(
                        "monthly_day",
                        "Weekday must be between 0 (Sunday) and 6 (Saturday)",
                    ));
                }
            }
        }
    }

    match rule.end {
        EndCondition::Never => {}
        EndCondition::AfterOccurrences(count) => {
            if count < 1 {
                errors.push(FieldError::new(
                    "end_after_occurrences",
                    "Number of occurrences must be at least 1",
                ));
            }
        }
        EndCondition::OnDate(end) => {
            if end <= rule.start.date() {
                errors.push(FieldError::new(
                    "end_date",
                    "End date must be after the start date",
                ));
            }
        }
    }

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        tracing::debug!(count = errors.len(), "rule failed validation");
        ValidationResult::Invalid(errors)
    }
}
