//! Newtype wrappers for enhanced type safety

use crate::constants::{
    DEFAULT_PRIORITY, HANDLER_NAMESPACE, MAX_PRIORITY, MIN_PRIORITY, NATIVE_EVENT_PREFIX,
};
use crate::errors::{Error, Result, Validate};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::str::FromStr;

/// A case-insensitive component name used as registry key.
///
/// Equality and hashing use the lower-cased canonical form; the spelling the
/// name was created with is kept for display.
#[derive(Debug, Clone)]
pub struct ComponentName {
    canonical: String,
    display: String,
}

impl ComponentName {
    /// Create a new ComponentName with validation
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let display = name.into();
        Validate::not_empty(&display, "component name")?;
        Validate::chars(
            &display,
            "component name",
            |c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'),
            "component names may only contain ASCII letters, digits, '_', '-', '.' and ':'",
        )?;
        Ok(Self {
            canonical: display.to_ascii_lowercase(),
            display,
        })
    }

    /// Registry name of the built-in handler for an event
    pub fn for_handler(event: &EventName) -> Self {
        let display = format!("{HANDLER_NAMESPACE}{event}");
        Self {
            canonical: display.to_ascii_lowercase(),
            display,
        }
    }

    /// The lower-cased key
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The name as it was spelled on creation
    pub fn as_str(&self) -> &str {
        &self.display
    }
}

impl PartialEq for ComponentName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ComponentName {}

impl Hash for ComponentName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl FromStr for ComponentName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ComponentName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// A validated, case-sensitive event name such as `onPrivmsg`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventName(String);

impl EventName {
    /// Create a new EventName with validation
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Validate::not_empty(&name, "event name")?;
        Validate::chars(
            &name,
            "event name",
            |c| c.is_ascii_alphanumeric() || c == '_',
            "event names may only contain ASCII letters, digits and '_'",
        )?;
        Ok(EventName(name))
    }

    /// Whether the name follows the `on*` convention required for the catalog
    pub fn follows_convention(&self) -> bool {
        self.0.starts_with(NATIVE_EVENT_PREFIX)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for EventName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Ordering and hashing of the wrapper agree with `str`, so sets keyed by
// `EventName` can be queried with plain strings.
impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for EventName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for EventName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EventName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.0
    }
}

/// Subscription priority in `1..=10`; higher runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(MIN_PRIORITY);
    pub const MAX: Priority = Priority(MAX_PRIORITY);

    /// Create a new Priority, rejecting values outside `1..=10`
    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(MIN_PRIORITY)..=i64::from(MAX_PRIORITY)).contains(&value) {
            Ok(Priority(value as u8))
        } else {
            Err(Error::InvalidPriority { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(DEFAULT_PRIORITY)
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Priority {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

/// Identifier of a scheduled cron job; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(u64);

impl JobId {
    pub fn new(value: u64) -> Self {
        JobId(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_component_name_is_case_insensitive() {
        let a = ComponentName::new("Database").unwrap();
        let b = ComponentName::new("dataBASE").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.canonical(), "database");
        assert_eq!(a.to_string(), "Database");

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_component_name_rejects_garbage() {
        assert!(ComponentName::new("").is_err());
        assert!(ComponentName::new("has space").is_err());
        assert!(ComponentName::new("../escape").is_err());
    }

    #[test]
    fn test_handler_component_name() {
        let event = EventName::new("onPrivmsg").unwrap();
        let name = ComponentName::for_handler(&event);
        assert_eq!(name.as_str(), "event.onPrivmsg");
        assert_eq!(name, ComponentName::new("EVENT.ONPRIVMSG").unwrap());
    }

    #[test]
    fn test_event_name_convention() {
        assert!(EventName::new("onJoin").unwrap().follows_convention());
        assert!(!EventName::new("join").unwrap().follows_convention());
        assert!(EventName::new("on-join").is_err());
    }

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::new(0).is_err());
        assert!(Priority::new(11).is_err());
        assert_eq!(Priority::new(10).unwrap(), Priority::MAX);
        assert_eq!(Priority::default().get(), 5);
        assert_eq!(Priority::new(1).unwrap(), Priority::MIN);
    }

    #[test]
    fn test_priority_deserialize_validates() {
        let ok: Priority = serde_json::from_str("7").unwrap();
        assert_eq!(ok.get(), 7);
        assert!(serde_json::from_str::<Priority>("42").is_err());
    }
}
