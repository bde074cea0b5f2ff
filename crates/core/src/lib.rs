//! Core domain types, errors, and capabilities for the `cerberus` host.
//!
//! This crate holds the building blocks shared by the resolver, the event
//! dispatcher and the cron scheduler. It carries no behavior of its own
//! beyond validation.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias covering every failure
//!   mode of the engine, from resolution to cron matching.
//! - **`types`**: validated newtypes such as `ComponentName`, `EventName`,
//!   `Priority` and `JobId`.
//! - **`callable`**: the `Callable` capability (invoke a method by name with
//!   JSON arguments) and the `MethodTable` helper that implements it.
//! - **`logger`**: the `Logger` capability used for best-effort failure
//!   reporting, with a `tracing` backed default.
//! - **`constants`**: shared defaults and environment variable names.

pub mod callable;
pub mod constants;
pub mod errors;
pub mod logger;
pub mod types;

pub use self::{
    callable::{Callable, Method, MethodTable},
    constants::*,
    errors::{Error, Result},
    logger::{log_context, LogContext, LogEntry, Logger, MemoryLogger, TracingLogger},
    types::*,
};

/// Re-exported so downstream crates share one JSON value type.
pub use serde_json::Value;
