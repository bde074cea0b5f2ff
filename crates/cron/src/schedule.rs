//! Whole cron expressions

use crate::field::{Field, FieldMatcher};
use cerberus_core::{Error, Result, TimeTuple};
use chrono::{DateTime, Duration, TimeZone, Timelike};
use std::fmt;
use std::str::FromStr;

// Four years of minutes covers every satisfiable expression, leap days included.
const SEARCH_LIMIT_MINUTES: i64 = 4 * 366 * 24 * 60;

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn normalize(expression: &str) -> String {
    expression.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check an expression eagerly; the scheduler itself only parses at match time
pub fn validate(expression: &str) -> Result<()> {
    Schedule::parse(expression).map(|_| ())
}

/// A parsed five-field cron expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    minute: FieldMatcher,
    hour: FieldMatcher,
    day_of_month: FieldMatcher,
    month: FieldMatcher,
    day_of_week: FieldMatcher,
}

impl Schedule {
    pub fn parse(expression: &str) -> Result<Self> {
        let normalized = normalize(expression);
        let parts: Vec<&str> = if normalized.is_empty() {
            Vec::new()
        } else {
            normalized.split(' ').collect()
        };
        let [minute, hour, day_of_month, month, day_of_week] = parts[..] else {
            return Err(Error::invalid_cron_expression(&normalized, parts.len()));
        };

        Ok(Self {
            minute: FieldMatcher::parse(Field::Minute, minute, &normalized)?,
            hour: FieldMatcher::parse(Field::Hour, hour, &normalized)?,
            day_of_month: FieldMatcher::parse(Field::DayOfMonth, day_of_month, &normalized)?,
            month: FieldMatcher::parse(Field::Month, month, &normalized)?,
            day_of_week: FieldMatcher::parse(Field::DayOfWeek, day_of_week, &normalized)?,
        })
    }

    pub fn field(&self, field: Field) -> &FieldMatcher {
        match field {
            Field::Minute => &self.minute,
            Field::Hour => &self.hour,
            Field::DayOfMonth => &self.day_of_month,
            Field::Month => &self.month,
            Field::DayOfWeek => &self.day_of_week,
        }
    }

    /// Whether the schedule fires at `at`.
    ///
    /// Minute, hour and month gate independently. When both day fields are
    /// restricted either one matching is enough; otherwise only the
    /// restricted one gates.
    pub fn matches(&self, at: &TimeTuple) -> bool {
        let days = match (self.day_of_month.is_any(), self.day_of_week.is_any()) {
            (true, true) => true,
            (false, true) => self.day_of_month.matches(at.day_of_month),
            (true, false) => self.day_of_week.matches(at.day_of_week),
            (false, false) => {
                self.day_of_month.matches(at.day_of_month)
                    || self.day_of_week.matches(at.day_of_week)
            }
        };

        days && self.minute.matches(at.minute)
            && self.hour.matches(at.hour)
            && self.month.matches(at.month)
    }

    /// The first minute strictly after `after` at which the schedule fires
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let start = after.with_second(0)?.with_nanosecond(0)?;
        (1..=SEARCH_LIMIT_MINUTES)
            .map(|offset| start.clone() + Duration::minutes(offset))
            .find(|candidate| self.matches(&TimeTuple::from(candidate)))
    }
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}
