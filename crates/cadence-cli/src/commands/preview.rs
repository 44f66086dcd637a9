use anyhow::Result;
use cadence_core::models::{Occurrence, RecurrenceRule};
use cadence_core::recurrence::{describe, RecurrenceEngine};
use chrono::{DateTime, Local};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use crate::cli::PreviewCommand;
use crate::commands::build_rule;
use crate::config::Config;
use crate::parser::parse_datetime;
use crate::views::table::display_occurrences;

#[derive(Serialize)]
struct PreviewOutput<'a> {
    description: String,
    rule: &'a RecurrenceRule,
    occurrences: &'a [Occurrence],
}

pub fn preview_rule(
    engine: &RecurrenceEngine,
    config: &Config,
    command: PreviewCommand,
    now: DateTime<Local>,
) -> Result<()> {
    let rule = build_rule(&command.rule, now)?;
    let count = command.limit.unwrap_or(engine.config().preview_count);

    let occurrences = if command.materialize {
        engine.materialize(&rule)?
    } else if let Some(after) = &command.after {
        engine.upcoming(&rule, parse_datetime(after, now)?, count)?
    } else {
        engine.expand(&rule, count)?
    };
    let description = describe(&rule);

    if command.json {
        let output = PreviewOutput {
            description,
            rule: &rule,
            occurrences: &occurrences,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let heading = Style::new().blue().bold();
    if rule.title.is_empty() {
        println!("{}", description.style(heading));
    } else {
        println!(
            "{} {}",
            rule.title.bright_white().bold(),
            format!("({})", description).style(heading)
        );
    }
    display_occurrences(&occurrences, &config.display.date_format, now.naive_local());

    if command.limit.unwrap_or(0) > engine.config().max_count {
        println!(
            "{} Showing at most {} occurrences",
            "Note:".yellow(),
            engine.config().max_count
        );
    }

    Ok(())
}
