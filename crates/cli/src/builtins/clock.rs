use cerberus_core::{Callable, Error, MethodTable, Result, Value, EVENT_TICK};
use cerberus_engine::Host;
use std::sync::Weak;

/// Cron target that dispatches `onTick`.
///
/// `run` forwards its argument as the tick arguments: an array is spread,
/// `null` means none, anything else is passed as the only argument.
pub struct Clock {
    host: Weak<Host>,
    methods: MethodTable<Clock>,
}

impl Clock {
    pub fn new(host: &Host) -> Result<Self> {
        Ok(Self {
            host: host.handle(),
            methods: MethodTable::new().with("run", Self::run),
        })
    }

    fn run(&self, args: &[Value]) -> Result<Value> {
        let host = self
            .host
            .upgrade()
            .ok_or_else(|| Error::handler("clock", "run", "host has shut down"))?;
        let args = match args.first() {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values.clone(),
            Some(value) => vec![value.clone()],
        };
        let outcome = host.try_dispatch(EVENT_TICK, &args)?;
        Ok(serde_json::to_value(outcome)?)
    }
}

impl Callable for Clock {
    fn name(&self) -> &str {
        "clock"
    }

    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.methods.invoke(self, method, args)
    }
}
