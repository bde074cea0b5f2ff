//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for cerberus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cerberus operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resolver has no constructor registered under this name
    NotFound { name: String },

    /// Resolving a component re-entered a component still under construction
    CyclicDependency { chain: Vec<String> },

    /// A resolved instance is not of the type the caller asked for
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    /// Subscribe or dispatch on a name absent from the event catalog
    UnknownEvent { event: String },

    /// A subscriber does not expose the requested method
    MissingMethod { subscriber: String, method: String },

    /// A cron expression does not have exactly five fields
    InvalidCronExpression { expression: String, fields: usize },

    /// A cron field has malformed content
    CronMatch {
        expression: String,
        field: &'static str,
        message: String,
    },

    /// A handler, plugin or cron target failed while being invoked
    Handler {
        component: String,
        method: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A name failed validation
    InvalidName {
        kind: &'static str,
        value: String,
        message: String,
    },

    /// A priority outside the accepted range
    InvalidPriority { value: i64 },

    /// Configuration errors
    Configuration { message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
