use super::{handlers::Privmsg, CONFIG, EVENT_PRIVMSG};
use cerberus_config::HostConfig;
use cerberus_core::{Callable, MethodTable, Result, Value};
use cerberus_engine::{Host, Plugin, PluginContext};
use serde_json::json;

const DEFAULT_TRIGGER: &str = "!echo ";

/// Repeats messages that start with the trigger (`!echo ` unless the
/// `echo_trigger` parameter says otherwise)
pub struct Echo {
    trigger: String,
    methods: MethodTable<Echo>,
}

impl Echo {
    pub fn new(host: &Host) -> Result<Self> {
        let config = host.resolve_as::<HostConfig>(CONFIG)?;
        let trigger = config
            .param("echo_trigger")
            .filter(|trigger| !trigger.is_empty())
            .unwrap_or(DEFAULT_TRIGGER)
            .to_string();
        Ok(Self {
            trigger,
            methods: MethodTable::new().with(EVENT_PRIVMSG, Self::on_privmsg),
        })
    }

    fn on_privmsg(&self, args: &[Value]) -> Result<Value> {
        let message = Privmsg::from_args(args)?;
        Ok(match message.text.strip_prefix(self.trigger.as_str()) {
            Some(rest) => json!({
                "channel": message.channel,
                "reply": format!("{}: {}", message.nick, rest),
            }),
            None => Value::Null,
        })
    }
}

impl Callable for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.methods.invoke(self, method, args)
    }
}

impl Plugin for Echo {
    fn register(&self, ctx: &PluginContext<'_>) {
        ctx.add_event(EVENT_PRIVMSG);
    }
}
