//! Test doubles for code built on the engine
//!
//! [`RecordingPlugin`] answers to whatever methods it is told to, appends
//! every call to a shared [`CallLog`], and can be told to fail on a method.

use crate::plugin::{Plugin, PluginContext};
use cerberus_core::{Callable, Error, Result, Value};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

pub use cerberus_core::MemoryLogger;

/// Calls recorded as `"<plugin>.<method>"`, shared between doubles
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Debug, Clone)]
struct PendingSubscription {
    event: String,
    method: Option<String>,
    priority: i64,
}

/// A configurable plugin that records its calls
#[derive(Debug, Clone)]
pub struct RecordingPlugin {
    name: String,
    methods: BTreeSet<String>,
    subscriptions: Vec<PendingSubscription>,
    fail_on: Option<String>,
    log: CallLog,
}

impl RecordingPlugin {
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            methods: BTreeSet::new(),
            subscriptions: Vec::new(),
            fail_on: None,
            log: Arc::clone(log),
        }
    }

    /// Answer to `method` without subscribing it anywhere
    pub fn with_method(mut self, method: &str) -> Self {
        self.methods.insert(method.to_string());
        self
    }

    /// Subscribe `method` (or the event name) to `event` at `priority` when
    /// registered. The method is added to the ones the plugin answers to.
    pub fn on(mut self, event: &str, method: Option<&str>, priority: i64) -> Self {
        self.methods
            .insert(method.unwrap_or(event).to_string());
        self.subscriptions.push(PendingSubscription {
            event: event.to_string(),
            method: method.map(str::to_string),
            priority,
        });
        self
    }

    /// Ask for a subscription without answering to its method
    pub fn on_unanswered(mut self, event: &str, method: &str) -> Self {
        self.subscriptions.push(PendingSubscription {
            event: event.to_string(),
            method: Some(method.to_string()),
            priority: 5,
        });
        self
    }

    /// Fail whenever `method` is called
    pub fn failing_on(mut self, method: &str) -> Self {
        self.methods.insert(method.to_string());
        self.fail_on = Some(method.to_string());
        self
    }
}

impl Callable for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.log.lock().push(format!("{}.{}", self.name, method));
        if self.fail_on.as_deref() == Some(method) {
            return Err(Error::handler(&self.name, method, "recording plugin told to fail"));
        }
        Ok(json!({ "plugin": self.name, "method": method, "args": args }))
    }
}

impl Plugin for RecordingPlugin {
    fn register(&self, ctx: &PluginContext<'_>) {
        for pending in &self.subscriptions {
            ctx.add_event_with(&pending.event, pending.method.as_deref(), pending.priority);
        }
    }
}
