use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// The repetition unit of a rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Advances by `interval` days, exactly like `Daily`. Kept as its own tag
    /// because callers offer it as a separate choice.
    Custom,
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Daily => write!(f, "daily"),
            Pattern::Weekly => write!(f, "weekly"),
            Pattern::Monthly => write!(f, "monthly"),
            Pattern::Yearly => write!(f, "yearly"),
            Pattern::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence pattern: {0}")]
pub struct ParsePatternError(String);

impl FromStr for Pattern {
    type Err = ParsePatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_plain::from_str(&s.to_lowercase()).map_err(|_| ParsePatternError(s.to_string()))
    }
}

/// How a monthly rule picks its day inside each month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonthlyRule {
    /// Fixed day-of-month (1-31), clamped to the last day of shorter months.
    ByDate { day: u32 },
    /// The `week`-th `weekday` of the month. `week` is 1..=5, or -1 for the
    /// last one. `weekday` uses 0 = Sunday .. 6 = Saturday.
    ByWeekday { week: i8, weekday: u8 },
}

/// When a series stops producing occurrences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EndCondition {
    #[default]
    Never,
    /// Total number of occurrences, counted from the anchor.
    AfterOccurrences(u32),
    /// Last date (inclusive) an occurrence may fall on.
    OnDate(NaiveDate),
}

/// A recurrence rule as authored by a user.
///
/// Expansion only ever borrows a rule, so a constructed rule stays as it was
/// built. Fields are public for struct-literal construction; the `with_*`
/// builders cover the common cases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Label of the recurring task. Only `validate` looks at it.
    #[serde(default)]
    pub title: String,
    pub pattern: Pattern,
    /// Pattern units between occurrences. Must be at least 1.
    pub interval: u32,
    /// Anchor of the series and always its first occurrence.
    pub start: NaiveDateTime,
    /// Weekday indices (0 = Sunday .. 6 = Saturday), used by `Weekly` only.
    #[serde(default)]
    pub days_of_week: BTreeSet<u8>,
    /// Used by `Monthly` only. `None` means "same day-of-month as `start`".
    #[serde(default)]
    pub monthly: Option<MonthlyRule>,
    #[serde(default)]
    pub end: EndCondition,
}

impl RecurrenceRule {
    /// Creates a rule repeating every single `pattern` unit, forever.
    pub fn new(pattern: Pattern, start: NaiveDateTime) -> Self {
        Self {
            title: String::new(),
            pattern,
            interval: 1,
            start,
            days_of_week: BTreeSet::new(),
            monthly: None,
            end: EndCondition::Never,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_days_of_week(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.days_of_week = days.into_iter().collect();
        self
    }

    pub fn with_monthly(mut self, monthly: MonthlyRule) -> Self {
        self.monthly = Some(monthly);
        self
    }

    pub fn with_end(mut self, end: EndCondition) -> Self {
        self.end = end;
        self
    }

    /// The monthly rule in effect, defaulting to the anchor's day-of-month.
    pub fn effective_monthly(&self) -> MonthlyRule {
        self.monthly.unwrap_or(MonthlyRule::ByDate {
            day: self.start.day(),
        })
    }
}

/// One generated date-time of a series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occurrence {
    /// The occurrence's date-time in the rule's (naive) local time.
    pub at: NaiveDateTime,
    /// Zero-based position in the full series, counted from the anchor.
    pub index: usize,
}

impl Occurrence {
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    /// Weekday index of this occurrence, 0 = Sunday.
    #[inline]
    pub fn weekday_index(&self) -> u8 {
        weekday_index(self.at.weekday())
    }
}

/// Converts a chrono weekday to the 0 = Sunday .. 6 = Saturday index.
#[inline]
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Converts a 0 = Sunday .. 6 = Saturday index to a chrono weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}
