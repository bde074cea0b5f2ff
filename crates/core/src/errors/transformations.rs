//! Validation helpers shared by the newtypes

use super::types::{Error, Result};

/// Functional validation utilities
pub struct Validate;

impl Validate {
    /// Validate that a name is not empty
    pub fn not_empty(value: &str, kind: &'static str) -> Result<()> {
        if value.is_empty() {
            Err(Error::invalid_name(kind, value, "cannot be empty"))
        } else {
            Ok(())
        }
    }

    /// Validate a name character by character
    pub fn chars<F>(value: &str, kind: &'static str, allowed: F, message: &str) -> Result<()>
    where
        F: Fn(char) -> bool,
    {
        if value.chars().all(allowed) {
            Ok(())
        } else {
            Err(Error::invalid_name(kind, value, message))
        }
    }
}
