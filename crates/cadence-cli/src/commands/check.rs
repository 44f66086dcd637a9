use anyhow::Result;
use cadence_core::recurrence::describe;
use cadence_core::validation::validate;
use chrono::{DateTime, Local};
use owo_colors::{OwoColorize, Style};

use crate::cli::CheckCommand;
use crate::commands::build_rule;

/// Validates a rule. Invalid rules are returned as `CoreError::ValidationFailed`
/// so the caller reports them and exits non-zero.
pub fn check_rule(command: CheckCommand, now: DateTime<Local>) -> Result<()> {
    let rule = build_rule(&command.rule, now)?;
    let result = validate(&rule);

    if command.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.is_valid() {
        let success_style = Style::new().green().bold();
        println!("{} Rule is valid: {}", "✓".style(success_style), describe(&rule));
    }

    Ok(result.into_result()?)
}
