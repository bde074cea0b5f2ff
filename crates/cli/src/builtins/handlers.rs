//! Built-in event handlers

use super::CONFIG;
use cerberus_config::HostConfig;
use cerberus_core::{Error, Result, Value};
use cerberus_engine::{EventHandler, Host};
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// A channel message as carried by `onPrivmsg`: `[nick, channel, text]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Privmsg {
    pub nick: String,
    pub channel: String,
    pub text: String,
}

impl Privmsg {
    pub fn from_args(args: &[Value]) -> Result<Self> {
        match args {
            [Value::String(nick), Value::String(channel), Value::String(text), ..] => Ok(Self {
                nick: nick.clone(),
                channel: channel.clone(),
                text: text.clone(),
            }),
            _ => Err(Error::handler(
                "event.onPrivmsg",
                "handle",
                "expected [nick, channel, text] strings",
            )),
        }
    }
}

pub(crate) fn privmsg(_: &Host, args: &[Value]) -> Result<Value> {
    let message = Privmsg::from_args(args)?;
    Ok(serde_json::to_value(message)?)
}

/// Answers `onConnect` with the bot id
pub struct ConnectHandler {
    bot_id: u32,
}

impl ConnectHandler {
    pub fn new(host: &Host) -> Result<Self> {
        let config = host.resolve_as::<HostConfig>(CONFIG)?;
        Ok(Self {
            bot_id: config.bot_id,
        })
    }
}

impl EventHandler for ConnectHandler {
    fn handle(&self, _: &Host, args: &[Value]) -> Result<Value> {
        info!(bot_id = self.bot_id, "connected");
        Ok(json!({ "bot_id": self.bot_id, "args": args }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privmsg_from_args() {
        let message = Privmsg::from_args(&[json!("alice"), json!("#rust"), json!("hi")]).unwrap();
        assert_eq!(message.nick, "alice");
        assert_eq!(message.channel, "#rust");
        assert_eq!(message.text, "hi");

        assert!(Privmsg::from_args(&[json!("alice"), json!("#rust")]).is_err());
        assert!(Privmsg::from_args(&[json!("alice"), json!("#rust"), json!(3)]).is_err());
    }
}
