//! The five cron fields and their matchers

use cerberus_core::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// One of the five positional fields of a cron expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl Field {
    /// Fields in expression order
    pub const ALL: [Field; 5] = [
        Field::Minute,
        Field::Hour,
        Field::DayOfMonth,
        Field::Month,
        Field::DayOfWeek,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Minute => "minute",
            Field::Hour => "hour",
            Field::DayOfMonth => "day-of-month",
            Field::Month => "month",
            Field::DayOfWeek => "day-of-week",
        }
    }

    /// Inclusive range a matcher for this field may contain
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Field::Minute => (0, 59),
            Field::Hour => (0, 23),
            Field::DayOfMonth => (1, 31),
            Field::Month => (1, 12),
            Field::DayOfWeek => (0, 6),
        }
    }

    // Day-of-week accepts 7 as an alias for Sunday.
    fn max_literal(self) -> u32 {
        match self {
            Field::DayOfWeek => 7,
            other => other.bounds().1,
        }
    }

    fn lookup_name(self, token: &str) -> Option<u32> {
        let (names, first): (&[&str], u32) = match self {
            Field::Month => (&MONTH_NAMES, 1),
            Field::DayOfWeek => (&WEEKDAY_NAMES, 0),
            _ => return None,
        };
        names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(token))
            .map(|index| index as u32 + first)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed form of a single cron field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMatcher {
    /// `*`: every value passes
    Any,
    /// An explicit ascending set within the field's bounds
    Values(BTreeSet<u32>),
}

impl FieldMatcher {
    /// Parse the text of one field.
    ///
    /// `expression` is only used for error messages.
    pub fn parse(field: Field, text: &str, expression: &str) -> Result<Self> {
        if text == "*" {
            return Ok(FieldMatcher::Any);
        }

        let invalid = |message: String| Error::cron_match(expression, field.name(), message);
        let mut values = BTreeSet::new();

        for part in text.split(',') {
            if part.is_empty() {
                return Err(invalid(format!("empty list element in '{text}'")));
            }

            let (base, step) = match part.split_once('/') {
                Some((base, step)) => {
                    let step: usize = step
                        .parse()
                        .map_err(|_| invalid(format!("step '{step}' is not a number")))?;
                    if step == 0 {
                        return Err(invalid("step must be greater than zero".to_string()));
                    }
                    (base, step)
                }
                None => (part, 1),
            };

            let expanded: Vec<u32> = if base == "*" {
                let (min, max) = field.bounds();
                (min..=max).collect()
            } else if let Some((from, to)) = base.split_once('-') {
                let from = parse_value(field, from).map_err(invalid)?;
                let to = parse_value(field, to).map_err(invalid)?;
                if from > to {
                    return Err(invalid(format!("range '{base}' runs backwards")));
                }
                (from..=to).collect()
            } else {
                vec![parse_value(field, base).map_err(invalid)?]
            };

            values.extend(expanded.into_iter().step_by(step).map(|value| {
                if field == Field::DayOfWeek && value == 7 {
                    0
                } else {
                    value
                }
            }));
        }

        Ok(FieldMatcher::Values(values))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, FieldMatcher::Any)
    }

    pub fn matches(&self, value: u32) -> bool {
        match self {
            FieldMatcher::Any => true,
            FieldMatcher::Values(values) => values.contains(&value),
        }
    }

    /// The explicit values, `None` for `*`
    pub fn values(&self) -> Option<Vec<u32>> {
        match self {
            FieldMatcher::Any => None,
            FieldMatcher::Values(values) => Some(values.iter().copied().collect()),
        }
    }
}

impl fmt::Display for FieldMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldMatcher::Any => f.write_str("*"),
            FieldMatcher::Values(values) => {
                let joined: Vec<String> = values.iter().map(u32::to_string).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

fn parse_value(field: Field, token: &str) -> std::result::Result<u32, String> {
    let value = match token.parse::<u32>() {
        Ok(value) => value,
        Err(_) => field
            .lookup_name(token)
            .ok_or_else(|| format!("'{token}' is not a number"))?,
    };
    let (min, _) = field.bounds();
    let max = field.max_literal();
    if value < min || value > max {
        return Err(format!("{value} is outside {min}-{max}"));
    }
    Ok(value)
}
