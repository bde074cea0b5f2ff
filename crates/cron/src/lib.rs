//! Cron-style scheduling for cerberus
//!
//! This crate handles matching five-field cron expressions against a wall
//! clock supplied from outside:
//! - Field parsing (lists, ranges, steps, month and weekday names)
//! - Classic day-of-month / day-of-week OR semantics
//! - A job list with monotonically increasing ids and per-job failure isolation

pub mod field;
pub mod schedule;
pub mod scheduler;

pub use field::{Field, FieldMatcher};
pub use schedule::{normalize, validate, Schedule};
pub use scheduler::{JobInfo, RunSummary, Scheduler};
