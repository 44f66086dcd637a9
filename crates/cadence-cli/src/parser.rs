use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_english::{parse_date_string, Dialect};
use std::collections::BTreeSet;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a start date-time such as "2024-01-01", "2024-01-01 09:00" or
/// "next monday". Natural-language input is resolved against `now`.
pub fn parse_datetime(input: &str, now: DateTime<Local>) -> Result<NaiveDateTime> {
    let input = input.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(datetime);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    parse_date_string(input, now, Dialect::Us)
        .map(|datetime| datetime.naive_local())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

/// Parses a calendar date; any time-of-day in the input is dropped.
pub fn parse_date(input: &str, now: DateTime<Local>) -> Result<NaiveDate> {
    parse_datetime(input, now).map(|datetime| datetime.date())
}

/// Parses a single weekday name or index (0 = Sunday .. 6 = Saturday).
pub fn parse_weekday(input: &str) -> Result<u8> {
    let day = input.trim().to_lowercase();
    let index = match day.as_str() {
        "sun" | "sunday" | "su" => 0,
        "mon" | "monday" | "m" => 1,
        "tue" | "tuesday" | "tu" => 2,
        "wed" | "wednesday" | "w" => 3,
        "thu" | "thursday" | "th" => 4,
        "fri" | "friday" | "f" => 5,
        "sat" | "saturday" | "sa" => 6,
        other => match other.parse::<u8>() {
            Ok(index) if index <= 6 => index,
            _ => return Err(anyhow!("Invalid day: '{}'", input.trim())),
        },
    };
    Ok(index)
}

/// Parse days string like "mon,tue,wed", "monday,tuesday", or "weekdays"
pub fn parse_days(days_str: &str) -> Result<BTreeSet<u8>> {
    let input = days_str.trim().to_lowercase();

    match input.as_str() {
        "weekdays" | "workdays" => return Ok((1..=5).collect()),
        "weekends" => return Ok([0, 6].into_iter().collect()),
        "daily" | "everyday" => return Ok((0..=6).collect()),
        _ => {}
    }

    let mut days = BTreeSet::new();
    let mut invalid_days = Vec::new();

    for day in input.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        match parse_weekday(day) {
            Ok(index) => {
                days.insert(index);
            }
            Err(_) => invalid_days.push(day.to_string()),
        }
    }

    if !invalid_days.is_empty() {
        return Err(anyhow!(
            "Invalid day(s): {}\n\nSupported formats:\n  • Full names: 'monday,tuesday,wednesday'\n  • Short names: 'mon,tue,wed'\n  • Single letters: 'm,tu,w,th,f,sa,su'\n  • Indices: '0' (Sunday) to '6' (Saturday)\n  • Groups: 'weekdays', 'weekends', 'daily'",
            invalid_days.join(", ")
        ));
    }

    if days.is_empty() {
        return Err(anyhow!(
            "No valid days specified in: '{}'\n\nExamples:\n  • mon,wed,fri\n  • weekdays\n  • monday,wednesday,friday",
            days_str
        ));
    }

    Ok(days)
}
