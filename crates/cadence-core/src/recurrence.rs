use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, Weekday};
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::models::{
    weekday_from_index, weekday_index, EndCondition, MonthlyRule, Occurrence, Pattern,
    RecurrenceRule,
};

/// Consecutive months an ordinal-weekday search may come up empty before the
/// series is considered exhausted. One full Gregorian cycle (400 years)
/// repeats every calendar layout, so no later month can match either.
pub const MAX_SKIPPED_MONTHS: u32 = 400 * 12;

/// Lazily computed occurrences of a rule, in ascending order.
///
/// The iterator ends on its own when the rule's end condition is reached or
/// when the next date would leave chrono's representable range. A rule with
/// `EndCondition::Never` is otherwise unbounded, so callers bound it with
/// `take` (which is what [`expand`] does).
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    monthly: MonthlyRule,
    emitted: usize,
    /// Next month step for ordinal-weekday rules, in units of `interval`.
    month_cursor: u32,
    previous: Option<NaiveDateTime>,
    done: bool,
}

impl<'a> Occurrences<'a> {
    /// Checks the rule's structure and prepares its expansion.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidRule` for rules that cannot be expanded; see
    /// [`check_rule`].
    pub fn new(rule: &'a RecurrenceRule) -> Result<Self, CoreError> {
        check_rule(rule)?;
        debug!(
            pattern = %rule.pattern,
            interval = rule.interval,
            start = %rule.start,
            end = ?rule.end,
            "expanding recurrence rule"
        );

        Ok(Self {
            rule,
            monthly: rule.effective_monthly(),
            emitted: 0,
            month_cursor: 0,
            previous: None,
            done: false,
        })
    }

    /// Moves a fresh iterator to the first occurrence after `as_of` for
    /// patterns that advance by a fixed number of days. Other patterns are
    /// left in place for the caller to walk.
    fn fast_forward(&mut self, as_of: NaiveDateTime) {
        let rule = self.rule;
        let step_days = match rule.pattern {
            Pattern::Daily | Pattern::Custom => u64::from(rule.interval),
            Pattern::Weekly if rule.days_of_week.is_empty() => u64::from(rule.interval) * 7,
            _ => return,
        };
        if self.emitted > 0 || as_of < rule.start {
            return;
        }

        // Occurrence k falls at start + k * period, so the first one strictly
        // after as_of is floor(elapsed / period) + 1. Sub-second parts of
        // elapsed cannot change that quotient.
        let Ok(elapsed) = u64::try_from((as_of - rule.start).num_seconds()) else {
            return;
        };
        let period = step_days * 86_400;
        let Ok(index) = usize::try_from(elapsed / period + 1) else {
            return;
        };
        trace!(index, %as_of, "fast-forwarding fixed-step rule");
        self.emitted = index;
    }

    /// Computes the next date-time of the pattern, ignoring end conditions.
    fn next_candidate(&mut self) -> Option<NaiveDateTime> {
        let rule = self.rule;
        let step = (self.emitted as u64).checked_mul(u64::from(rule.interval))?;

        match rule.pattern {
            Pattern::Daily | Pattern::Custom => rule.start.checked_add_days(Days::new(step)),
            Pattern::Weekly if rule.days_of_week.is_empty() => {
                rule.start.checked_add_days(Days::new(step.checked_mul(7)?))
            }
            Pattern::Weekly => match self.previous {
                None => Some(rule.start),
                Some(previous) => self.next_listed_weekday(previous),
            },
            Pattern::Monthly => match self.monthly {
                MonthlyRule::ByDate { .. } if self.emitted == 0 => Some(rule.start),
                MonthlyRule::ByDate { day } => {
                    let months = u32::try_from(step).ok()?;
                    clamped_day_in_month(rule.start, months, day)
                }
                MonthlyRule::ByWeekday { week, weekday } => {
                    self.next_ordinal_weekday(week, weekday)
                }
            },
            Pattern::Yearly => {
                let months = u32::try_from(step.checked_mul(12)?).ok()?;
                rule.start
                    .date()
                    .checked_add_months(Months::new(months))
                    .map(|date| date.and_time(rule.start.time()))
            }
        }
    }

    /// Scans forward one day at a time for a weekday in the rule's set.
    ///
    /// `interval` plays no part here: the next listed weekday is taken even
    /// when `interval` > 1.
    fn next_listed_weekday(&self, previous: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut candidate = previous;
        for _ in 0..7 {
            candidate = candidate.checked_add_days(Days::new(1))?;
            if self
                .rule
                .days_of_week
                .contains(&weekday_index(candidate.weekday()))
            {
                return Some(candidate);
            }
        }
        None
    }

    fn next_ordinal_weekday(&mut self, week: i8, weekday: u8) -> Option<NaiveDateTime> {
        let weekday = weekday_from_index(weekday)?;
        let anchor = self.rule.start;
        let first_month = first_of_month(anchor.date())?;

        for _ in 0..MAX_SKIPPED_MONTHS {
            let offset = self.month_cursor.checked_mul(self.rule.interval)?;
            self.month_cursor = self.month_cursor.checked_add(1)?;

            let month = first_month.checked_add_months(Months::new(offset))?;
            match ordinal_weekday(month.year(), month.month(), week, weekday) {
                Some(date) => {
                    let candidate = date.and_time(anchor.time());
                    if candidate >= anchor {
                        return Some(candidate);
                    }
                    trace!(%candidate, "ordinal weekday falls before the anchor, skipping month");
                }
                None => {
                    trace!(
                        year = month.year(),
                        month = month.month(),
                        week,
                        "month has no such ordinal weekday, skipping"
                    );
                }
            }
        }

        debug!(week, %weekday, "no matching month within a full calendar cycle");
        None
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let EndCondition::AfterOccurrences(count) = self.rule.end {
            if self.emitted >= count as usize {
                self.done = true;
                return None;
            }
        }

        let Some(candidate) = self.next_candidate() else {
            self.done = true;
            return None;
        };

        if let EndCondition::OnDate(end) = self.rule.end {
            if candidate.date() > end {
                trace!(%candidate, %end, "occurrence overshoots end date");
                self.done = true;
                return None;
            }
        }

        debug_assert!(self.previous.is_none_or(|previous| previous < candidate));
        self.previous = Some(candidate);
        let index = self.emitted;
        self.emitted += 1;

        Some(Occurrence {
            at: candidate,
            index,
        })
    }
}

/// Checks the structural soundness of a rule.
///
/// This is the contract `expand` relies on; user-facing field checks live in
/// [`crate::validation::validate`].
pub fn check_rule(rule: &RecurrenceRule) -> Result<(), CoreError> {
    if rule.interval < 1 {
        return Err(CoreError::InvalidRule(
            "interval must be at least 1".to_string(),
        ));
    }

    if rule.pattern == Pattern::Weekly {
        if let Some(day) = rule.days_of_week.iter().find(|&&day| day > 6) {
            return Err(CoreError::InvalidRule(format!(
                "weekday index {} is outside 0-6",
                day
            )));
        }
    }

    if rule.pattern == Pattern::Monthly {
        match rule.effective_monthly() {
            MonthlyRule::ByDate { day } if !(1..=31).contains(&day) => {
                return Err(CoreError::InvalidRule(format!(
                    "monthly date {} is outside 1-31",
                    day
                )));
            }
            MonthlyRule::ByWeekday { week, .. } if !is_valid_ordinal(week) => {
                return Err(CoreError::InvalidRule(format!(
                    "monthly week {} must be 1-5 or -1",
                    week
                )));
            }
            MonthlyRule::ByWeekday { weekday, .. } if weekday > 6 => {
                return Err(CoreError::InvalidRule(format!(
                    "monthly weekday index {} is outside 0-6",
                    weekday
                )));
            }
            _ => {}
        }
    }

    match rule.end {
        EndCondition::AfterOccurrences(0) => Err(CoreError::InvalidRule(
            "occurrence count must be at least 1".to_string(),
        )),
        EndCondition::OnDate(end) if end < rule.start.date() => Err(CoreError::InvalidRule(
            format!("end date {} precedes start date {}", end, rule.start.date()),
        )),
        _ => Ok(()),
    }
}

/// Valid ordinals for "nth weekday of the month": 1 through 5, or -1 for last.
#[inline]
pub fn is_valid_ordinal(week: i8) -> bool {
    week == -1 || (1..=5).contains(&week)
}

/// Expands a rule into at most `max_occurrences` ascending occurrences.
///
/// The first occurrence is the rule's `start` itself, except for
/// ordinal-weekday monthly rules, which begin at the first matching weekday on
/// or after `start`.
///
/// # Errors
/// Returns `CoreError::InvalidRule` when the rule fails [`check_rule`].
pub fn expand(
    rule: &RecurrenceRule,
    max_occurrences: usize,
) -> Result<Vec<Occurrence>, CoreError> {
    let occurrences: Vec<Occurrence> = Occurrences::new(rule)?.take(max_occurrences).collect();
    debug!(
        requested = max_occurrences,
        produced = occurrences.len(),
        "expansion finished"
    );
    Ok(occurrences)
}

/// Occurrences strictly after `as_of`, at most `max_occurrences` of them.
///
/// End conditions still count from the anchor, so a rule limited to five
/// occurrences never yields a sixth however late `as_of` is.
pub fn occurrences_after(
    rule: &RecurrenceRule,
    as_of: NaiveDateTime,
    max_occurrences: usize,
) -> Result<Vec<Occurrence>, CoreError> {
    let mut occurrences = Occurrences::new(rule)?;
    occurrences.fast_forward(as_of);
    Ok(occurrences
        .skip_while(|occurrence| occurrence.at <= as_of)
        .take(max_occurrences)
        .collect())
}

/// The first occurrence strictly after `as_of`, or `None` once the series has ended.
pub fn next_occurrence_after(
    rule: &RecurrenceRule,
    as_of: NaiveDateTime,
) -> Result<Option<Occurrence>, CoreError> {
    Ok(occurrences_after(rule, as_of, 1)?.into_iter().next())
}

/// Renders a rule as a short English sentence, e.g.
/// "Every 2 weeks on Mon, Wed, Fri, 3 times".
pub fn describe(rule: &RecurrenceRule) -> String {
    let every = |unit: &str, single: &str| {
        if rule.interval == 1 {
            single.to_string()
        } else {
            format!("Every {} {}s", rule.interval, unit)
        }
    };

    let mut text = match rule.pattern {
        Pattern::Daily => every("day", "Daily"),
        Pattern::Custom => format!("Every {} day{}", rule.interval, plural(rule.interval)),
        Pattern::Weekly => {
            let mut text = every("week", "Weekly");
            if !rule.days_of_week.is_empty() {
                let days: Vec<String> = rule
                    .days_of_week
                    .iter()
                    .filter_map(|&day| weekday_from_index(day))
                    .map(|day| day.to_string())
                    .collect();
                text.push_str(&format!(" on {}", days.join(", ")));
            }
            text
        }
        Pattern::Monthly => {
            let text = every("month", "Monthly");
            match rule.effective_monthly() {
                MonthlyRule::ByDate { day } => format!("{} on day {}", text, day),
                MonthlyRule::ByWeekday { week, weekday } => format!(
                    "{} on the {} {}",
                    text,
                    ordinal_name(week),
                    weekday_from_index(weekday).map_or_else(|| "?".to_string(), full_weekday_name)
                ),
            }
        }
        Pattern::Yearly => format!(
            "{} on {}",
            every("year", "Yearly"),
            rule.start.format("%b %-d")
        ),
    };

    match rule.end {
        EndCondition::Never => {}
        EndCondition::AfterOccurrences(count) => {
            text.push_str(&format!(", {} time{}", count, plural(count)))
        }
        EndCondition::OnDate(end) => text.push_str(&format!(", until {}", end)),
    }

    text
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn ordinal_name(week: i8) -> &'static str {
    match week {
        1 => "first",
        2 => "second",
        3 => "third",
        4 => "fourth",
        5 => "fifth",
        -1 => "last",
        _ => "?",
    }
}

fn full_weekday_name(weekday: Weekday) -> String {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
    .to_string()
}

// ============================================================================
// Calendar arithmetic
// ============================================================================

#[inline]
fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// Number of days in the month starting at `first`.
fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// `day` of the month `months` after the anchor's month, clamped to that
/// month's last day, at the anchor's time of day.
fn clamped_day_in_month(anchor: NaiveDateTime, months: u32, day: u32) -> Option<NaiveDateTime> {
    let month = first_of_month(anchor.date())?.checked_add_months(Months::new(months))?;
    let last = days_in_month(month)?;
    month
        .with_day(day.min(last))
        .map(|date| date.and_time(anchor.time()))
}

/// The `week`-th `weekday` of a month, -1 meaning the last one. `None` when
/// the month has no such day (e.g. a fifth Monday).
pub fn ordinal_weekday(year: i32, month: u32, week: i8, weekday: Weekday) -> Option<NaiveDate> {
    if week == -1 {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        let back = (7 + last.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
        return last.checked_sub_days(Days::new(u64::from(back)));
    }

    let n = u8::try_from(week).ok()?;
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

// ============================================================================
// RecurrenceEngine
// ============================================================================

/// Bounds applied to expansion requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionConfig {
    /// Occurrences shown by a preview
    pub preview_count: usize,
    /// Occurrences produced when materializing a series ahead of time
    pub materialize_count: usize,
    /// Hard ceiling for any single request
    pub max_count: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            preview_count: 10,
            materialize_count: 365,
            max_count: 10_000,
        }
    }
}

/// Expansion with configured bounds.
///
/// Holds nothing but its configuration; every call works only on the rule it
/// is given, so one engine can serve any number of callers.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceEngine {
    config: ExpansionConfig,
}

impl RecurrenceEngine {
    pub fn new(config: ExpansionConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ExpansionConfig::default())
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Limits a requested count to the configured ceiling.
    #[inline]
    pub fn clamp_count(&self, requested: usize) -> usize {
        if requested > self.config.max_count {
            debug!(requested, max = self.config.max_count, "clamping occurrence count");
        }
        requested.min(self.config.max_count)
    }

    /// Expands at most `count` occurrences (clamped to `max_count`).
    pub fn expand(
        &self,
        rule: &RecurrenceRule,
        count: usize,
    ) -> Result<Vec<Occurrence>, CoreError> {
        expand(rule, self.clamp_count(count))
    }

    /// The first `preview_count` occurrences.
    pub fn preview(&self, rule: &RecurrenceRule) -> Result<Vec<Occurrence>, CoreError> {
        self.expand(rule, self.config.preview_count)
    }

    /// The first `materialize_count` occurrences.
    pub fn materialize(&self, rule: &RecurrenceRule) -> Result<Vec<Occurrence>, CoreError> {
        self.expand(rule, self.config.materialize_count)
    }

    /// Occurrences strictly after `as_of`, clamped like [`Self::expand`].
    pub fn upcoming(
        &self,
        rule: &RecurrenceRule,
        as_of: NaiveDateTime,
        count: usize,
    ) -> Result<Vec<Occurrence>, CoreError> {
        occurrences_after(rule, as_of, self.clamp_count(count))
    }
}
