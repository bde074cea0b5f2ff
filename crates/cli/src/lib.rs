//! The cerberus host binary as a library: built-in components, start-up
//! and the pieces of the main loop
pub mod builtins;
pub mod commands;
pub mod runtime;

pub use commands::Commands;
