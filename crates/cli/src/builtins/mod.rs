//! Components shipped with the host binary
//!
//! | name             | kind     | purpose                                         |
//! |------------------|----------|-------------------------------------------------|
//! | `config`         | state    | the loaded [`HostConfig`]                       |
//! | `event.onConnect`| handler  | acknowledges the connection                     |
//! | `event.onPrivmsg`| handler  | validates `[nick, channel, text]` messages      |
//! | `clock`          | callable | cron target that dispatches `onTick`            |
//! | `echo`           | plugin   | answers `!echo <text>`                          |
//! | `counter`        | plugin   | counts messages and ticks                       |

pub mod clock;
pub mod counter;
pub mod echo;
pub mod handlers;

pub use clock::Clock;
pub use counter::Counter;
pub use echo::Echo;
pub use handlers::{ConnectHandler, Privmsg};

use cerberus_config::HostConfig;
use cerberus_core::{Result, EVENT_CONNECT};
use cerberus_engine::HostBuilder;

pub const CONFIG: &str = "config";
pub const CLOCK: &str = "clock";
pub const ECHO: &str = "echo";
pub const COUNTER: &str = "counter";
pub const EVENT_PRIVMSG: &str = "onPrivmsg";

/// Add every built-in component to `builder`
pub fn register(builder: HostBuilder, config: &HostConfig) -> Result<HostBuilder> {
    let config = config.clone();
    builder
        .component(CONFIG, move |_| Ok(config.clone()))?
        .handler(EVENT_CONNECT, ConnectHandler::new)?
        .handler(EVENT_PRIVMSG, |_| Ok(handlers::privmsg))?
        .callable(CLOCK, Clock::new)?
        .plugin(ECHO, Echo::new)?
        .plugin(COUNTER, |_| Ok(Counter::default()))
}
