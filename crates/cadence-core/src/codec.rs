//! Delimited `key:value` encoding used by the task store.
//!
//! ```text
//! pattern:weekly;interval:2;start:2024-01-01T09:00:00;days:1,3,5;end:after:10;title:Standup
//! ```
//!
//! `title` is always written last and runs to the end of the input, so it may
//! contain `;` and keeps any surrounding whitespace. `start` carries fractional
//! seconds only when it has them.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use tracing::trace;

use crate::error::CoreError;
use crate::models::{EndCondition, MonthlyRule, Pattern, RecurrenceRule};

pub const START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TITLE_KEY: &str = "title:";

/// Serializes a rule into its stored form.
pub fn encode(rule: &RecurrenceRule) -> String {
    let mut parts = vec![
        format!("pattern:{}", rule.pattern),
        format!("interval:{}", rule.interval),
        format!("start:{}", rule.start.format(START_FORMAT)),
    ];

    if !rule.days_of_week.is_empty() {
        let days: Vec<String> = rule.days_of_week.iter().map(u8::to_string).collect();
        parts.push(format!("days:{}", days.join(",")));
    }

    match rule.monthly {
        Some(MonthlyRule::ByDate { day }) => parts.push(format!("monthly:date:{}", day)),
        Some(MonthlyRule::ByWeekday { week, weekday }) => {
            parts.push(format!("monthly:weekday:{}:{}", week, weekday))
        }
        None => {}
    }

    parts.push(match rule.end {
        EndCondition::Never => "end:never".to_string(),
        EndCondition::AfterOccurrences(count) => format!("end:after:{}", count),
        EndCondition::OnDate(date) => format!("end:on:{}", date.format(DATE_FORMAT)),
    });

    if !rule.title.is_empty() {
        parts.push(format!("{}{}", TITLE_KEY, rule.title));
    }

    parts.join(";")
}

/// Parses a stored rule.
///
/// `pattern` and `start` are required; `interval` defaults to 1 and `end` to
/// `never`. Values are parsed but not range-checked, which is left to
/// [`crate::validation::validate`] and the engine.
pub fn decode(input: &str) -> Result<RecurrenceRule, CoreError> {
    let mut pattern = None;
    let mut interval = None;
    let mut start = None;
    let mut days = None;
    let mut monthly = None;
    let mut end = None;
    let mut title = None;

    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let (segment, tail) = if rest.starts_with(TITLE_KEY) {
            (rest, "")
        } else {
            let (segment, tail) = rest.split_once(';').unwrap_or((rest, ""));
            (segment.trim_end(), tail)
        };
        rest = tail.trim_start();

        if segment.is_empty() {
            continue;
        }

        let (key, value) = segment
            .split_once(':')
            .ok_or_else(|| CoreError::Codec(format!("expected key:value, found '{}'", segment)))?;
        let key = key.trim();
        trace!(key, value, "decoding rule segment");

        match key {
            "pattern" => set_once(&mut pattern, key, parse_pattern(value)?)?,
            "interval" => set_once(&mut interval, key, parse_number::<u32>(key, value)?)?,
            "start" => set_once(&mut start, key, parse_start(value)?)?,
            "days" => set_once(&mut days, key, parse_days(value)?)?,
            "monthly" => set_once(&mut monthly, key, parse_monthly(value)?)?,
            "end" => set_once(&mut end, key, parse_end(value)?)?,
            "title" => set_once(&mut title, key, value.to_string())?,
            other => return Err(CoreError::Codec(format!("unknown key '{}'", other))),
        }
    }

    Ok(RecurrenceRule {
        title: title.unwrap_or_default(),
        pattern: pattern.ok_or_else(|| CoreError::Codec("missing 'pattern'".to_string()))?,
        interval: interval.unwrap_or(1),
        start: start.ok_or_else(|| CoreError::Codec("missing 'start'".to_string()))?,
        days_of_week: days.unwrap_or_default(),
        monthly,
        end: end.unwrap_or_default(),
    })
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<(), CoreError> {
    if slot.is_some() {
        return Err(CoreError::Codec(format!("duplicate key '{}'", key)));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_pattern(value: &str) -> Result<Pattern, CoreError> {
    value
        .trim()
        .parse()
        .map_err(|e: crate::models::ParsePatternError| CoreError::Codec(e.to_string()))
}

fn parse_number<T: std::str::FromStr>(what: &str, value: &str) -> Result<T, CoreError> {
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::Codec(format!("invalid {} '{}'", what, value)))
}

fn parse_start(value: &str) -> Result<NaiveDateTime, CoreError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, START_FORMAT)
        .or_else(|_| parse_date(value).map(|d| d.and_time(chrono::NaiveTime::MIN)))
        .map_err(|_| CoreError::Codec(format!("invalid start '{}'", value)))
}

fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::Codec(format!("invalid date '{}'", value)))
}

fn parse_days(value: &str) -> Result<BTreeSet<u8>, CoreError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|day| !day.is_empty())
        .map(|day| parse_number::<u8>("weekday", day))
        .collect()
}

fn parse_monthly(value: &str) -> Result<MonthlyRule, CoreError> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    match parts.as_slice() {
        ["date", day] => Ok(MonthlyRule::ByDate {
            day: parse_number("monthly date", day)?,
        }),
        ["weekday", week, weekday] => Ok(MonthlyRule::ByWeekday {
            week: parse_number("monthly week", week)?,
            weekday: parse_number("monthly weekday", weekday)?,
        }),
        _ => Err(CoreError::Codec(format!("invalid monthly '{}'", value))),
    }
}

fn parse_end(value: &str) -> Result<EndCondition, CoreError> {
    match value.trim().split_once(':') {
        None if value.trim() == "never" => Ok(EndCondition::Never),
        Some(("after", count)) => Ok(EndCondition::AfterOccurrences(parse_number(
            "occurrence count",
            count,
        )?)),
        Some(("on", date)) => Ok(EndCondition::OnDate(parse_date(date)?)),
        _ => Err(CoreError::Codec(format!("invalid end '{}'", value))),
    }
}
