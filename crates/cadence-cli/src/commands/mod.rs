pub mod check;
pub mod encode;
pub mod preview;

use anyhow::{anyhow, Result};
use cadence_core::codec;
use cadence_core::models::{EndCondition, MonthlyRule, RecurrenceRule};
use chrono::{DateTime, Local, NaiveTime};

use crate::cli::RuleArgs;
use crate::parser::{parse_date, parse_datetime, parse_days, parse_weekday};

/// Builds a rule from either `--rule` or the individual rule flags.
///
/// Without `--start` the rule starts today at midnight.
pub fn build_rule(args: &RuleArgs, now: DateTime<Local>) -> Result<RecurrenceRule> {
    if let Some(encoded) = &args.rule {
        let mut rule = codec::decode(encoded)?;
        if let Some(title) = &args.title {
            rule.title = title.clone();
        }
        return Ok(rule);
    }

    let shortcut = args
        .every
        .ok_or_else(|| anyhow!("Either --rule or --every must be provided"))?;

    let start = match &args.start {
        Some(start) => parse_datetime(start, now)?,
        None => now.date_naive().and_time(NaiveTime::MIN),
    };

    let mut rule = RecurrenceRule::new(shortcut.pattern(), start)
        .with_days_of_week(shortcut.implied_days().iter().copied());

    if let Some(title) = &args.title {
        rule = rule.with_title(title.clone());
    }
    if let Some(interval) = args.interval {
        rule = rule.with_interval(interval);
    }
    if let Some(on) = &args.on {
        rule = rule.with_days_of_week(parse_days(on)?);
    }

    if let Some(day) = args.monthly_date {
        rule = rule.with_monthly(MonthlyRule::ByDate { day });
    } else if let (Some(week), Some(weekday)) = (args.monthly_week, &args.monthly_day) {
        rule = rule.with_monthly(MonthlyRule::ByWeekday {
            week,
            weekday: parse_weekday(weekday)?,
        });
    }

    if let Some(count) = args.count {
        rule = rule.with_end(EndCondition::AfterOccurrences(count));
    } else if let Some(until) = &args.until {
        rule = rule.with_end(EndCondition::OnDate(parse_date(until, now)?));
    }

    tracing::debug!(rule = %codec::encode(&rule), "built rule from arguments");
    Ok(rule)
}
