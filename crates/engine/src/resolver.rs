//! Lazy, caching construction of named components

use crate::handler::EventHandler;
use crate::host::Host;
use cerberus_core::{Callable, ComponentName, Error, EventName, Result};
use parking_lot::{Mutex, RwLock};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::debug;

pub(crate) type Constructor = Box<dyn Fn(&Host) -> Result<Instance> + Send + Sync>;

/// What a registration was declared as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    /// Plain shared state reachable through [`Instance::downcast`]
    Component,
    /// Invocable by method name
    Callable,
    /// A plugin; invocable and subscribed on construction
    Plugin,
    /// Built-in handler for the given event
    Handler(EventName),
}

pub(crate) struct Registration {
    pub(crate) kind: ComponentKind,
    pub(crate) construct: Constructor,
}

/// A constructed component together with the capabilities it was registered
/// with. Cloning is cheap and keeps the identity.
#[derive(Clone)]
pub struct Instance {
    name: ComponentName,
    any: Arc<dyn Any + Send + Sync>,
    callable: Option<Arc<dyn Callable>>,
    handler: Option<Arc<dyn EventHandler>>,
}

impl Instance {
    pub(crate) fn new(
        name: ComponentName,
        any: Arc<dyn Any + Send + Sync>,
        callable: Option<Arc<dyn Callable>>,
        handler: Option<Arc<dyn EventHandler>>,
    ) -> Self {
        Self {
            name,
            any,
            callable,
            handler,
        }
    }

    pub fn name(&self) -> &ComponentName {
        &self.name
    }

    /// The concrete value, failing with `TypeMismatch` for any other type
    pub fn downcast<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        Arc::clone(&self.any)
            .downcast::<T>()
            .map_err(|_| Error::type_mismatch(self.name.as_str(), type_name::<T>()))
    }

    pub fn as_callable(&self) -> Result<Arc<dyn Callable>> {
        self.callable
            .clone()
            .ok_or_else(|| Error::type_mismatch(self.name.as_str(), "callable"))
    }

    pub fn as_handler(&self) -> Result<Arc<dyn EventHandler>> {
        self.handler
            .clone()
            .ok_or_else(|| Error::type_mismatch(self.name.as_str(), "event handler"))
    }

    /// Whether both values are the same cached instance
    pub fn same_instance(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.any, &other.any)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("callable", &self.callable.is_some())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Builds each registered component on first request and hands out the
/// cached instance afterwards.
///
/// Constructors receive the [`Host`] and may resolve further components.
/// A name that is requested again while its own constructor is still
/// running on the same thread fails with `CyclicDependency`. Threads racing
/// on the same name may each run its constructor; the first instance stored
/// is the one every caller gets.
pub struct Resolver {
    registrations: HashMap<ComponentName, Registration>,
    instances: RwLock<HashMap<ComponentName, Instance>>,
    in_progress: Mutex<HashMap<ThreadId, Vec<ComponentName>>>,
}

impl Resolver {
    pub(crate) fn new(registrations: HashMap<ComponentName, Registration>) -> Self {
        Self {
            registrations,
            instances: RwLock::new(HashMap::new()),
            in_progress: Mutex::new(HashMap::new()),
        }
    }

    /// Return the instance for `name`, constructing it on first use
    pub fn resolve(&self, host: &Host, name: &str) -> Result<Instance> {
        let key = ComponentName::new(name).map_err(|_| Error::not_found(name))?;
        self.resolve_name(host, &key)
    }

    pub fn resolve_name(&self, host: &Host, key: &ComponentName) -> Result<Instance> {
        if let Some(instance) = self.instances.read().get(key) {
            return Ok(instance.clone());
        }

        let registration = self
            .registrations
            .get(key)
            .ok_or_else(|| Error::not_found(key.as_str()))?;

        let thread = thread::current().id();
        {
            let mut in_progress = self.in_progress.lock();
            let stack = in_progress.entry(thread).or_default();
            if stack.contains(key) {
                let mut chain: Vec<String> =
                    stack.iter().map(|n| n.as_str().to_string()).collect();
                chain.push(key.as_str().to_string());
                return Err(Error::cyclic_dependency(chain));
            }
            stack.push(key.clone());
        }

        let built = (registration.construct)(host);
        {
            let mut in_progress = self.in_progress.lock();
            if let Some(stack) = in_progress.get_mut(&thread) {
                stack.retain(|pending| pending != key);
                if stack.is_empty() {
                    in_progress.remove(&thread);
                }
            }
        }
        let instance = built?;

        debug!(component = %key, kind = ?registration.kind, "component constructed");
        Ok(self
            .instances
            .write()
            .entry(key.clone())
            .or_insert(instance)
            .clone())
    }

    /// Resolve and downcast to a concrete type
    pub fn resolve_as<T: Any + Send + Sync>(&self, host: &Host, name: &str) -> Result<Arc<T>> {
        self.resolve(host, name)?.downcast::<T>()
    }

    /// Resolve `name` and call `method` on it
    pub fn invoke(
        &self,
        host: &Host,
        name: &str,
        method: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value> {
        let callable = self.resolve(host, name)?.as_callable()?;
        callable.call(method, args)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        ComponentName::new(name)
            .map(|key| self.registrations.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        ComponentName::new(name)
            .map(|key| self.instances.read().contains_key(&key))
            .unwrap_or(false)
    }

    pub fn kind(&self, name: &str) -> Option<&ComponentKind> {
        let key = ComponentName::new(name).ok()?;
        self.registrations.get(&key).map(|r| &r.kind)
    }

    /// Registered names, sorted by canonical form
    pub fn registered_names(&self) -> Vec<&ComponentName> {
        let mut names: Vec<_> = self.registrations.keys().collect();
        names.sort_by(|a, b| a.canonical().cmp(b.canonical()));
        names
    }

    /// Events that have a built-in handler registered
    pub fn handler_events(&self) -> impl Iterator<Item = &EventName> + '_ {
        self.registrations
            .values()
            .filter_map(|registration| match &registration.kind {
                ComponentKind::Handler(event) => Some(event),
                _ => None,
            })
    }

    pub fn has_handler(&self, event: &EventName) -> bool {
        self.registrations
            .contains_key(&ComponentName::for_handler(event))
    }
}
