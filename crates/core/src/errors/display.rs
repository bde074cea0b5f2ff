//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound { name } => {
                write!(f, "no component registered under '{name}'")
            }
            Error::CyclicDependency { chain } => {
                write!(f, "cyclic dependency while resolving: {}", chain.join(" -> "))
            }
            Error::TypeMismatch { name, expected } => {
                write!(f, "component '{name}' is not a {expected}")
            }
            Error::UnknownEvent { event } => {
                write!(f, "the event {event} does not exist")
            }
            Error::MissingMethod { subscriber, method } => {
                write!(f, "'{subscriber}' has no method '{method}'")
            }
            Error::InvalidCronExpression { expression, fields } => {
                write!(
                    f,
                    "cron expression '{expression}' has {fields} fields, expected 5"
                )
            }
            Error::CronMatch {
                expression,
                field,
                message,
            } => {
                write!(
                    f,
                    "cron expression '{expression}' has an invalid {field} field: {message}"
                )
            }
            Error::Handler {
                component,
                method,
                message,
                ..
            } => {
                write!(f, "'{component}::{method}' failed: {message}")
            }
            Error::InvalidName {
                kind,
                value,
                message,
            } => {
                write!(f, "invalid {kind} '{value}': {message}")
            }
            Error::InvalidPriority { value } => {
                write!(f, "priority {value} is not in range [1, 10]")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}
