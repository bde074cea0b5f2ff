use super::EVENT_PRIVMSG;
use cerberus_core::{Callable, MethodTable, Result, Value, EVENT_TICK};
use cerberus_engine::{Plugin, PluginContext};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts channel messages and clock ticks.
///
/// Sees messages before every other plugin and ticks after them. `count`
/// reports both totals; `reset` (a handy cron target) zeroes them.
pub struct Counter {
    messages: AtomicU64,
    ticks: AtomicU64,
    methods: MethodTable<Counter>,
}

impl Default for Counter {
    fn default() -> Self {
        Self {
            messages: AtomicU64::new(0),
            ticks: AtomicU64::new(0),
            methods: MethodTable::new()
                .with(EVENT_PRIVMSG, Self::on_privmsg)
                .with("tick", Self::tick)
                .with("count", Self::count)
                .with("reset", Self::reset),
        }
    }
}

impl Counter {
    fn on_privmsg(&self, _: &[Value]) -> Result<Value> {
        Ok(Value::from(self.messages.fetch_add(1, Ordering::Relaxed) + 1))
    }

    fn tick(&self, _: &[Value]) -> Result<Value> {
        Ok(Value::from(self.ticks.fetch_add(1, Ordering::Relaxed) + 1))
    }

    fn count(&self, _: &[Value]) -> Result<Value> {
        Ok(json!({
            "messages": self.messages.load(Ordering::Relaxed),
            "ticks": self.ticks.load(Ordering::Relaxed),
        }))
    }

    fn reset(&self, args: &[Value]) -> Result<Value> {
        let before = self.count(args)?;
        self.messages.store(0, Ordering::Relaxed);
        self.ticks.store(0, Ordering::Relaxed);
        Ok(before)
    }
}

impl Callable for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.methods.invoke(self, method, args)
    }
}

impl Plugin for Counter {
    fn register(&self, ctx: &PluginContext<'_>) {
        ctx.add_event_with(EVENT_PRIVMSG, None, 10);
        ctx.add_event_with(EVENT_TICK, Some("tick"), 1);
    }
}
