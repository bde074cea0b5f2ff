//! The contract third-party extensions implement

use crate::host::Host;
use cerberus_core::{log_context, Callable, Error, Priority, Value};
use std::sync::Arc;
use tracing::warn;

/// An extension that subscribes itself to events when constructed.
///
/// Register plugins with [`crate::HostBuilder::plugin`]; right after the
/// constructor returns, the host calls [`Plugin::register`] with a context
/// bound to the new instance.
pub trait Plugin: Callable {
    fn register(&self, ctx: &PluginContext<'_>);
}

/// What a plugin can reach while registering: the host, and subscription
/// management on its own behalf.
///
/// Registration failures are logged and never abort construction.
pub struct PluginContext<'a> {
    host: &'a Host,
    subscriber: Arc<dyn Callable>,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(host: &'a Host, subscriber: Arc<dyn Callable>) -> Self {
        Self { host, subscriber }
    }

    pub fn host(&self) -> &'a Host {
        self.host
    }

    /// Subscribe the method named like the event at the default priority
    pub fn add_event(&self, event: &str) -> bool {
        self.add_event_with(event, None, i64::from(Priority::default().get()))
    }

    /// Subscribe `method` (defaulting to the event name) at `priority`.
    ///
    /// Returns whether the subscription was registered.
    pub fn add_event_with(&self, event: &str, method: Option<&str>, priority: i64) -> bool {
        let method = method.unwrap_or(event);
        let result = if self.subscriber.responds_to(method) {
            Priority::new(priority).and_then(|priority| {
                self.host
                    .subscribe(event, &self.subscriber, Some(method), priority)
            })
        } else {
            Err(Error::missing_method(self.subscriber.name(), method))
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                self.host.logger().error(
                    &e.to_string(),
                    &log_context([
                        ("event", Value::from(event)),
                        ("method", Value::from(method)),
                    ]),
                );
                false
            }
        }
    }

    /// Drop every subscription this plugin holds for `event`
    pub fn remove_event(&self, event: &str) -> usize {
        let removed = self.host.unsubscribe(event, &self.subscriber);
        if removed == 0 {
            warn!(event, plugin = self.subscriber.name(), "no subscription to remove");
        }
        removed
    }
}
