/// Constants used throughout the cerberus codebase
// Event naming convention
pub const NATIVE_EVENT_PREFIX: &str = "on";

// Lifecycle events fired by the host itself
pub const EVENT_CONNECT: &str = "onConnect";
pub const EVENT_DISCONNECT: &str = "onDisconnect";
pub const EVENT_TICK: &str = "onTick";
pub const EVENT_SHUTDOWN: &str = "onShutdown";
pub const NATIVE_EVENTS: &[&str] = &[EVENT_CONNECT, EVENT_DISCONNECT, EVENT_TICK, EVENT_SHUTDOWN];

// Built-in handlers live in the registry under this namespace
pub const HANDLER_NAMESPACE: &str = "event.";

// Subscription priorities
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;
pub const DEFAULT_PRIORITY: u8 = 5;

// Cron defaults
pub const DEFAULT_CRON_METHOD: &str = "run";

// Environment variable names
pub const CERBERUS_CONFIG_VAR: &str = "CERBERUS_CONFIG";
pub const CERBERUS_LOG_VAR: &str = "CERBERUS_LOG";

// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Host loop
pub const DEFAULT_TICK_SECONDS: u64 = 60;
