//! The host context handed to every constructed component

use crate::catalog::EventCatalog;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::handler::EventHandler;
use crate::plugin::{Plugin, PluginContext};
use crate::resolver::{ComponentKind, Constructor, Instance, Registration, Resolver};
use cerberus_core::{
    log_context, Callable, ComponentName, Error, EventName, JobId, Logger, Priority, Result,
    TracingLogger, Value, DEFAULT_CRON_METHOD,
};
use cerberus_cron::{RunSummary, Scheduler};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{info, warn};

/// Owns the resolver, dispatcher, scheduler and logger for the lifetime of
/// the process, and exposes the engine's operations in one place.
pub struct Host {
    me: Weak<Host>,
    resolver: Resolver,
    dispatcher: Dispatcher,
    scheduler: Scheduler,
    logger: Arc<dyn Logger>,
}

impl Host {
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    /// A non-owning handle for components that need the host after their
    /// constructor has returned
    pub fn handle(&self) -> Weak<Host> {
        self.me.clone()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn resolve(&self, name: &str) -> Result<Instance> {
        self.resolver.resolve(self, name)
    }

    pub fn resolve_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        self.resolver.resolve_as(self, name)
    }

    pub fn invoke(&self, name: &str, method: &str, args: &[Value]) -> Result<Value> {
        self.resolver.invoke(self, name, method, args)
    }

    pub fn catalog(&self) -> &EventCatalog {
        self.dispatcher.catalog(&self.resolver)
    }

    pub fn dispatch(&self, event: &str, args: &[Value]) -> Option<DispatchOutcome> {
        self.dispatcher.dispatch(self, event, args)
    }

    pub fn try_dispatch(&self, event: &str, args: &[Value]) -> Result<DispatchOutcome> {
        self.dispatcher.try_dispatch(self, event, args)
    }

    pub fn subscribe(
        &self,
        event: &str,
        subscriber: &Arc<dyn Callable>,
        method: Option<&str>,
        priority: Priority,
    ) -> Result<()> {
        self.dispatcher
            .subscribe(&self.resolver, event, subscriber, method, priority)
    }

    pub fn unsubscribe(&self, event: &str, subscriber: &Arc<dyn Callable>) -> usize {
        self.dispatcher.unsubscribe(event, subscriber)
    }

    pub fn cron_add(
        &self,
        expression: &str,
        target: Arc<dyn Callable>,
        method: Option<&str>,
        params: Option<Value>,
    ) -> JobId {
        self.scheduler.add_with(
            expression,
            target,
            method.unwrap_or(DEFAULT_CRON_METHOD),
            params,
        )
    }

    pub fn cron_remove(&self, id: JobId) -> bool {
        self.scheduler.remove(id)
    }

    pub fn cron_run(
        &self,
        minute: u32,
        hour: u32,
        day_of_month: u32,
        month: u32,
        day_of_week: u32,
    ) -> RunSummary {
        self.scheduler
            .run(minute, hour, day_of_month, month, day_of_week)
    }

    /// Resolve each plugin so it registers its subscriptions.
    ///
    /// A plugin that fails to load is logged and skipped; returns how many
    /// loaded.
    pub fn load_plugins<S: AsRef<str>>(&self, names: &[S]) -> usize {
        let mut loaded = 0;
        for name in names {
            let name = name.as_ref();
            let result = match self.resolver.kind(name) {
                Some(ComponentKind::Plugin) => self.resolve(name).map(|_| ()),
                Some(_) => Err(Error::type_mismatch(name, "plugin")),
                None => Err(Error::not_found(name)),
            };
            match result {
                Ok(()) => {
                    info!(plugin = name, "plugin loaded");
                    loaded += 1;
                }
                Err(e) => self
                    .logger
                    .error(&e.to_string(), &log_context([("plugin", Value::from(name))])),
            }
        }
        loaded
    }
}

/// Collects the factory table and builds the [`Host`].
///
/// Registering a name twice keeps the later constructor.
pub struct HostBuilder {
    registrations: HashMap<ComponentName, Registration>,
    logger: Option<Arc<dyn Logger>>,
}

impl HostBuilder {
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
            logger: None,
        }
    }

    /// Use `logger` for failure reporting instead of `tracing`
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Register plain shared state, reachable with [`Host::resolve_as`]
    pub fn component<T, F>(self, name: &str, ctor: F) -> Result<Self>
    where
        T: Any + Send + Sync,
        F: Fn(&Host) -> Result<T> + Send + Sync + 'static,
    {
        let key = ComponentName::new(name)?;
        let name = key.clone();
        Ok(self.insert(
            key,
            ComponentKind::Component,
            Box::new(move |host: &Host| {
                let value = Arc::new(ctor(host)?);
                Ok(Instance::new(name.clone(), value, None, None))
            }),
        ))
    }

    /// Register something invocable by method name: an [`Host::invoke`]
    /// target or a cron target
    pub fn callable<T, F>(self, name: &str, ctor: F) -> Result<Self>
    where
        T: Callable,
        F: Fn(&Host) -> Result<T> + Send + Sync + 'static,
    {
        let key = ComponentName::new(name)?;
        let name = key.clone();
        Ok(self.insert(
            key,
            ComponentKind::Callable,
            Box::new(move |host: &Host| {
                let value = Arc::new(ctor(host)?);
                let callable: Arc<dyn Callable> = value.clone();
                Ok(Instance::new(name.clone(), value, Some(callable), None))
            }),
        ))
    }

    /// Register the built-in handler for `event`
    pub fn handler<H, F>(self, event: &str, ctor: F) -> Result<Self>
    where
        H: EventHandler,
        F: Fn(&Host) -> Result<H> + Send + Sync + 'static,
    {
        let event = EventName::new(event)?;
        if !event.follows_convention() {
            warn!(event = %event, "handler name does not start with 'on' and will not be dispatchable");
        }
        let key = ComponentName::for_handler(&event);
        if let Some(Registration {
            kind: ComponentKind::Handler(existing),
            ..
        }) = self.registrations.get(&key)
        {
            if existing.as_str() != event.as_str() {
                return Err(Error::invalid_name(
                    "event name",
                    event.as_str(),
                    format!("differs from handler '{existing}' only in case"),
                ));
            }
        }
        let name = key.clone();
        Ok(self.insert(
            key,
            ComponentKind::Handler(event),
            Box::new(move |host: &Host| {
                let value = Arc::new(ctor(host)?);
                let handler: Arc<dyn EventHandler> = value.clone();
                Ok(Instance::new(name.clone(), value, None, Some(handler)))
            }),
        ))
    }

    /// Register a plugin; it subscribes itself when first resolved
    pub fn plugin<P, F>(self, name: &str, ctor: F) -> Result<Self>
    where
        P: Plugin,
        F: Fn(&Host) -> Result<P> + Send + Sync + 'static,
    {
        let key = ComponentName::new(name)?;
        let name = key.clone();
        Ok(self.insert(
            key,
            ComponentKind::Plugin,
            Box::new(move |host: &Host| {
                let plugin = Arc::new(ctor(host)?);
                let callable: Arc<dyn Callable> = plugin.clone();
                plugin.register(&PluginContext::new(host, Arc::clone(&callable)));
                Ok(Instance::new(name.clone(), plugin, Some(callable), None))
            }),
        ))
    }

    fn insert(mut self, key: ComponentName, kind: ComponentKind, construct: Constructor) -> Self {
        if let Some(previous) = self.registrations.get(&key) {
            warn!(component = %key, previous = ?previous.kind, "replacing registration");
        }
        self.registrations
            .insert(key, Registration { kind, construct });
        self
    }

    pub fn build(self) -> Arc<Host> {
        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(TracingLogger) as Arc<dyn Logger>);
        let registrations = self.registrations;
        Arc::new_cyclic(|me| Host {
            me: me.clone(),
            resolver: Resolver::new(registrations),
            dispatcher: Dispatcher::new(),
            scheduler: Scheduler::with_logger(Arc::clone(&logger)),
            logger,
        })
    }
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}
