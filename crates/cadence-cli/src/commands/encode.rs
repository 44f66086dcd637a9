use anyhow::Result;
use cadence_core::codec;
use cadence_core::recurrence::check_rule;
use chrono::{DateTime, Local};

use crate::cli::EncodeCommand;
use crate::commands::build_rule;

/// Prints the stored form of a rule. Rules the engine could not expand are
/// refused so nothing unusable reaches the task store.
pub fn encode_rule(command: EncodeCommand, now: DateTime<Local>) -> Result<()> {
    let rule = build_rule(&command.rule, now)?;
    check_rule(&rule)?;
    println!("{}", codec::encode(&rule));
    Ok(())
}
