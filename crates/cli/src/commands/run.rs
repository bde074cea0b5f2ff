use crate::runtime::{self, Ticker};
use cerberus_config::HostConfig;
use cerberus_core::{Value, EVENT_CONNECT, EVENT_DISCONNECT, EVENT_SHUTDOWN};
use cerberus_utils::tracing::event_span;
use chrono::Utc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

// Land just past the boundary so the wall clock has already rolled over.
const BOUNDARY_SLACK_MS: u64 = 50;

/// Time from `now_ms` (Unix millis) to the next multiple of `period_secs`
fn until_boundary(period_secs: u64, now_ms: i64) -> Duration {
    let period_ms = period_secs.max(1) * 1000;
    let elapsed = now_ms.rem_euclid(period_ms as i64) as u64;
    Duration::from_millis(period_ms - elapsed + BOUNDARY_SLACK_MS)
}

pub async fn execute(config: HostConfig) -> eyre::Result<()> {
    let host = runtime::start(&config)?;
    host.dispatch(EVENT_CONNECT, &[Value::from(config.bot_id)]);

    let mut ticker = Ticker::new(config.utc);
    let mut interval = tokio::time::interval_at(
        Instant::now() + until_boundary(config.tick_seconds, Utc::now().timestamp_millis()),
        Duration::from_secs(config.tick_seconds),
    );
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let _span = event_span(cerberus_core::EVENT_TICK).entered();
                ticker.tick(&host, Utc::now());
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    let _span = event_span(line.split_whitespace().next().unwrap_or("")).entered();
                    match runtime::handle_line(&host, &line) {
                        Ok(Some(output)) => println!("{output}"),
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "ignoring input line"),
                    }
                }
                None => {
                    info!("stdin closed, running on the clock only");
                    stdin_open = false;
                }
            },
            result = &mut shutdown => {
                result?;
                info!("shutting down");
                break;
            }
        }
    }

    host.dispatch(EVENT_DISCONNECT, &[]);
    host.dispatch(EVENT_SHUTDOWN, &[]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_until_boundary() {
        // 12:00:45.250 waits for 12:01:00
        let now = 12 * 3600 * 1000 + 45_250;
        assert_eq!(until_boundary(60, now), Duration::from_millis(14_750 + 50));
        assert_eq!(until_boundary(60, 0), Duration::from_millis(60_000 + 50));
        assert_eq!(until_boundary(15, 16_000), Duration::from_millis(14_000 + 50));
    }
}
