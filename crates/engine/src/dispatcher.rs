//! Priority-ordered fan-out of events
//!
//! A dispatch first runs the event's built-in handler (if one is registered)
//! and then every plugin subscription, priority 10 down to 1 and in
//! registration order within a priority. The first failure ends the whole
//! dispatch: [`Dispatcher::dispatch`] logs it and returns `None`, and the
//! subscriptions after the failing one are not invoked.

use crate::catalog::EventCatalog;
use crate::host::Host;
use crate::resolver::Resolver;
use cerberus_core::{
    log_context, Callable, ComponentName, Error, EventName, Priority, Result, Value,
    NATIVE_EVENTS,
};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};
use tracing::{debug, debug_span};

/// Results of a successful dispatch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchOutcome {
    /// Return value of the built-in handler, `None` when the event has none
    pub builtin: Option<Value>,
    /// Return values of the plugin subscriptions, in call order
    pub plugins: Vec<Value>,
}

struct Subscription {
    subscriber: Weak<dyn Callable>,
    subscriber_name: String,
    method: String,
}

impl Subscription {
    fn is(&self, subscriber: &Arc<dyn Callable>) -> bool {
        std::ptr::eq(
            self.subscriber.as_ptr() as *const (),
            Arc::as_ptr(subscriber) as *const (),
        )
    }
}

// Buckets are walked in reverse key order.
type Buckets = BTreeMap<Priority, Vec<Subscription>>;

/// The event catalog and the plugin subscription table.
///
/// The dispatcher only holds weak references to subscribers; the resolver
/// owns plugins for the lifetime of the host.
pub struct Dispatcher {
    catalog: OnceCell<EventCatalog>,
    table: RwLock<HashMap<EventName, Buckets>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            catalog: OnceCell::new(),
            table: RwLock::new(HashMap::new()),
        }
    }

    /// The catalog, computed from the resolver on first use and frozen
    pub fn catalog(&self, resolver: &Resolver) -> &EventCatalog {
        self.catalog.get_or_init(|| {
            let native = NATIVE_EVENTS.iter().filter_map(|n| EventName::new(*n).ok());
            let catalog = EventCatalog::build(resolver.handler_events(), native);
            debug!(events = catalog.len(), "event catalog computed");
            catalog
        })
    }

    fn known_event(&self, resolver: &Resolver, event: &str) -> Result<EventName> {
        self.catalog(resolver)
            .get(event)
            .cloned()
            .ok_or_else(|| Error::unknown_event(event))
    }

    /// Register `subscriber.method` for `event`; `method` defaults to the
    /// event name.
    pub fn subscribe(
        &self,
        resolver: &Resolver,
        event: &str,
        subscriber: &Arc<dyn Callable>,
        method: Option<&str>,
        priority: Priority,
    ) -> Result<()> {
        let event = self.known_event(resolver, event)?;
        let method = method.unwrap_or(event.as_str());
        if !subscriber.responds_to(method) {
            return Err(Error::missing_method(subscriber.name(), method));
        }

        self.table
            .write()
            .entry(event.clone())
            .or_default()
            .entry(priority)
            .or_default()
            .push(Subscription {
                subscriber: Arc::downgrade(subscriber),
                subscriber_name: subscriber.name().to_string(),
                method: method.to_string(),
            });
        debug!(event = %event, subscriber = subscriber.name(), method, priority = %priority, "subscribed");
        Ok(())
    }

    /// Remove every subscription `subscriber` holds for `event`.
    ///
    /// Returns how many were removed.
    pub fn unsubscribe(&self, event: &str, subscriber: &Arc<dyn Callable>) -> usize {
        let mut table = self.table.write();
        let Some(buckets) = table.get_mut(event) else {
            return 0;
        };

        let mut removed = 0;
        for bucket in buckets.values_mut() {
            let before = bucket.len();
            bucket.retain(|subscription| !subscription.is(subscriber));
            removed += before - bucket.len();
        }
        buckets.retain(|_, bucket| !bucket.is_empty());
        if buckets.is_empty() {
            table.remove(event);
        }

        if removed > 0 {
            debug!(event, subscriber = subscriber.name(), removed, "unsubscribed");
        }
        removed
    }

    pub fn subscription_count(&self, event: &str) -> usize {
        self.table
            .read()
            .get(event)
            .map(|buckets| buckets.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Dispatch with failures logged and turned into `None`
    pub fn dispatch(&self, host: &Host, event: &str, args: &[Value]) -> Option<DispatchOutcome> {
        match self.try_dispatch(host, event, args) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                host.logger().error(
                    &e.to_string(),
                    &log_context([
                        ("name", Value::from(event)),
                        ("arguments", Value::from(args.to_vec())),
                    ]),
                );
                None
            }
        }
    }

    /// Dispatch, returning the first failure
    pub fn try_dispatch(&self, host: &Host, event: &str, args: &[Value]) -> Result<DispatchOutcome> {
        let _span = debug_span!("dispatch", event).entered();
        let event = self.known_event(host.resolver(), event)?;

        let builtin = if host.resolver().has_handler(&event) {
            let handler = host
                .resolver()
                .resolve_name(host, &ComponentName::for_handler(&event))?
                .as_handler()?;
            Some(handler.handle(host, args)?)
        } else {
            None
        };

        let plugins = self.fan_out(&event, args)?;
        Ok(DispatchOutcome { builtin, plugins })
    }

    fn fan_out(&self, event: &EventName, args: &[Value]) -> Result<Vec<Value>> {
        // Snapshot so handlers may subscribe or unsubscribe while running.
        let targets: Vec<(Weak<dyn Callable>, String, String)> = match self.table.read().get(event) {
            Some(buckets) => buckets
                .values()
                .rev()
                .flatten()
                .map(|s| (s.subscriber.clone(), s.subscriber_name.clone(), s.method.clone()))
                .collect(),
            None => return Ok(Vec::new()),
        };

        let mut results = Vec::with_capacity(targets.len());
        let mut stale = false;
        for (subscriber, name, method) in targets {
            let Some(subscriber) = subscriber.upgrade() else {
                debug!(event = %event, subscriber = %name, "skipping dropped subscriber");
                stale = true;
                continue;
            };
            results.push(subscriber.call(&method, args)?);
        }

        if stale {
            self.prune(event);
        }
        Ok(results)
    }

    fn prune(&self, event: &EventName) {
        let mut table = self.table.write();
        if let Some(buckets) = table.get_mut(event) {
            for bucket in buckets.values_mut() {
                bucket.retain(|subscription| subscription.subscriber.strong_count() > 0);
            }
            buckets.retain(|_, bucket| !bucket.is_empty());
            if buckets.is_empty() {
                table.remove(event);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
