use crate::runtime;
use cerberus_config::HostConfig;

pub fn execute(config: &HostConfig) -> eyre::Result<()> {
    let host = runtime::start(config)?;
    for event in host.catalog().iter() {
        let builtin = if host.resolver().has_handler(event) {
            "builtin"
        } else {
            "native"
        };
        println!(
            "{:<16} {builtin:<8} {} subscription(s)",
            event.as_str(),
            host.dispatcher().subscription_count(event)
        );
    }
    Ok(())
}
