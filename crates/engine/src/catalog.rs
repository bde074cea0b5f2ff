//! The closed set of event names the dispatcher accepts

use cerberus_core::EventName;
use std::collections::BTreeSet;

/// Known events: every built-in handler plus the dispatcher's native
/// events, keeping only names that follow the `on*` convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCatalog {
    events: BTreeSet<EventName>,
}

impl EventCatalog {
    pub fn build<'a>(
        handlers: impl IntoIterator<Item = &'a EventName>,
        native: impl IntoIterator<Item = EventName>,
    ) -> Self {
        let events = handlers
            .into_iter()
            .cloned()
            .chain(native)
            .filter(EventName::follows_convention)
            .collect();
        Self { events }
    }

    pub fn contains(&self, event: &str) -> bool {
        self.get(event).is_some()
    }

    pub fn get(&self, event: &str) -> Option<&EventName> {
        self.events.get(event)
    }

    /// Events in lexical order
    pub fn iter(&self) -> impl Iterator<Item = &EventName> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
