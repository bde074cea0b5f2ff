//! Error types for cerberus operations

mod builders;
mod conversions;
mod display;
mod transformations;
mod types;

pub use builders::*;
pub use transformations::Validate;
pub use types::{Error, Result};
