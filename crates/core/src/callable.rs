//! Invocation of components by method name
//!
//! Plugins, cron targets and anything reached through `Resolver::invoke`
//! are addressed by a method name and receive JSON arguments. Rust has no
//! reflection, so each implementor publishes the methods it answers to;
//! [`MethodTable`] does the bookkeeping for the common case.

use crate::errors::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Something that can be invoked by method name.
pub trait Callable: Send + Sync + 'static {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Whether `method` can be called on this instance
    fn responds_to(&self, method: &str) -> bool;

    /// Invoke `method` with `args`
    fn call(&self, method: &str, args: &[Value]) -> Result<Value>;
}

/// A method reachable through a [`MethodTable`]
pub type Method<T> = fn(&T, &[Value]) -> Result<Value>;

/// Name → method mapping for a concrete `Callable`.
///
/// ```
/// use cerberus_core::{Callable, MethodTable, Result, Value};
///
/// struct Greeter {
///     methods: MethodTable<Greeter>,
/// }
///
/// impl Greeter {
///     fn new() -> Self {
///         Self {
///             methods: MethodTable::new().with("onJoin", Self::on_join),
///         }
///     }
///
///     fn on_join(&self, args: &[Value]) -> Result<Value> {
///         Ok(Value::from(format!("hello {}", args.len())))
///     }
/// }
///
/// impl Callable for Greeter {
///     fn name(&self) -> &str {
///         "greeter"
///     }
///
///     fn responds_to(&self, method: &str) -> bool {
///         self.methods.contains(method)
///     }
///
///     fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
///         self.methods.invoke(self, method, args)
///     }
/// }
///
/// let greeter = Greeter::new();
/// assert!(greeter.responds_to("onJoin"));
/// assert_eq!(greeter.call("onJoin", &[]).unwrap(), Value::from("hello 0"));
/// ```
pub struct MethodTable<T> {
    methods: HashMap<&'static str, Method<T>>,
}

impl<T: Callable> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Add a method, replacing an earlier one with the same name
    #[must_use]
    pub fn with(mut self, name: &'static str, method: Method<T>) -> Self {
        self.methods.insert(name, method);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in no particular order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.keys().copied()
    }

    /// Dispatch `name` on `target`
    pub fn invoke(&self, target: &T, name: &str, args: &[Value]) -> Result<Value> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| Error::missing_method(target.name(), name))?;
        method(target, args)
    }
}

impl<T: Callable> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
