//! Domain types shared across the engine

pub mod newtypes;
pub mod time;

pub use newtypes::{ComponentName, EventName, JobId, Priority};
pub use time::TimeTuple;
