//! The cerberus extensibility engine
//!
//! This crate wires together the pieces a running host needs:
//! - [`Resolver`]: lazily constructs and caches named components from an
//!   explicit factory table
//! - [`Dispatcher`] and [`EventCatalog`]: priority-ordered fan-out of events
//!   to built-in handlers and plugin subscriptions
//! - [`Plugin`] and [`PluginContext`]: the contract extensions implement to
//!   subscribe themselves while being constructed
//! - [`Host`]: the context object handed to every constructor, owning the
//!   resolver, dispatcher, scheduler and logger

pub mod catalog;
pub mod dispatcher;
pub mod handler;
pub mod host;
pub mod plugin;
pub mod resolver;
pub mod testing;

pub use catalog::EventCatalog;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use handler::EventHandler;
pub use host::{Host, HostBuilder};
pub use plugin::{Plugin, PluginContext};
pub use resolver::{ComponentKind, Instance, Resolver};
