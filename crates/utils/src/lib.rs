//! Shared runtime utilities for cerberus
//!
//! Currently the process-wide `tracing` setup used by the host binary.

pub mod tracing;
