//! The time tuple a cron pass is matched against

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock fields supplied by the external clock driving the scheduler.
///
/// `day_of_week` counts from Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeTuple {
    pub minute: u32,
    pub hour: u32,
    pub day_of_month: u32,
    pub month: u32,
    pub day_of_week: u32,
}

impl TimeTuple {
    pub fn new(minute: u32, hour: u32, day_of_month: u32, month: u32, day_of_week: u32) -> Self {
        Self {
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        }
    }
}

impl fmt::Display for TimeTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for TimeTuple {
    fn from(at: &DateTime<Tz>) -> Self {
        Self {
            minute: at.minute(),
            hour: at.hour(),
            day_of_month: at.day(),
            month: at.month(),
            day_of_week: at.weekday().num_days_from_sunday(),
        }
    }
}
