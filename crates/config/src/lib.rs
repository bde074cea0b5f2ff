//! Configuration loading for the cerberus host
//!
//! A [`HostConfig`] is read from an optional JSON file and then adjusted by
//! `key=value` parameters, usually taken from the command line.

pub mod config;
pub mod loader;

pub use config::{CronEntry, HostConfig};
pub use loader::{parse_param, ConfigLoader};
