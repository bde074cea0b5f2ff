//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create a not-found error for a component name
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Error::NotFound { name: name.into() }
    }

    /// Create a cyclic dependency error from the resolution chain
    #[must_use]
    pub fn cyclic_dependency(chain: Vec<String>) -> Self {
        Error::CyclicDependency { chain }
    }

    /// Create a type mismatch error
    #[must_use]
    pub fn type_mismatch(name: impl Into<String>, expected: &'static str) -> Self {
        Error::TypeMismatch {
            name: name.into(),
            expected,
        }
    }

    /// Create an unknown event error
    #[must_use]
    pub fn unknown_event(event: impl Into<String>) -> Self {
        Error::UnknownEvent {
            event: event.into(),
        }
    }

    /// Create a missing method error
    #[must_use]
    pub fn missing_method(subscriber: impl Into<String>, method: impl Into<String>) -> Self {
        Error::MissingMethod {
            subscriber: subscriber.into(),
            method: method.into(),
        }
    }

    /// Create an invalid cron expression error
    #[must_use]
    pub fn invalid_cron_expression(expression: impl Into<String>, fields: usize) -> Self {
        Error::InvalidCronExpression {
            expression: expression.into(),
            fields,
        }
    }

    /// Create a cron field error
    #[must_use]
    pub fn cron_match(
        expression: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Error::CronMatch {
            expression: expression.into(),
            field,
            message: message.into(),
        }
    }

    /// Create a handler failure
    #[must_use]
    pub fn handler(
        component: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Handler {
            component: component.into(),
            method: method.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a handler failure wrapping the underlying error
    #[must_use]
    pub fn handler_with_source(
        component: impl Into<String>,
        method: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let source = source.into();
        Error::Handler {
            component: component.into(),
            method: method.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an invalid name error
    #[must_use]
    pub fn invalid_name(
        kind: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::InvalidName {
            kind,
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}
