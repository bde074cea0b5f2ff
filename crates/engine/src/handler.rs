//! Built-in event handlers

use crate::host::Host;
use cerberus_core::{Result, Value};

/// The built-in handler for one event, registered under `event.<name>`.
///
/// Its return value becomes the `builtin` part of a dispatch outcome.
pub trait EventHandler: Send + Sync + 'static {
    fn handle(&self, host: &Host, args: &[Value]) -> Result<Value>;
}

impl<F> EventHandler for F
where
    F: Fn(&Host, &[Value]) -> Result<Value> + Send + Sync + 'static,
{
    fn handle(&self, host: &Host, args: &[Value]) -> Result<Value> {
        self(host, args)
    }
}
