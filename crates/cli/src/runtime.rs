//! Host start-up and the pieces of the main loop

use crate::builtins;
use cerberus_config::{CronEntry, HostConfig};
use cerberus_core::{Error, JobId, Result, Value, EVENT_TICK};
use cerberus_cron::{validate, RunSummary};
use cerberus_engine::Host;
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Build the host with the built-in components, load the configured
/// plugins and schedule the configured cron entries
pub fn start(config: &HostConfig) -> Result<Arc<Host>> {
    let host = builtins::register(Host::builder(), config)?.build();

    let loaded = host.load_plugins(config.plugins.as_slice());
    if loaded < config.plugins.len() {
        warn!(
            loaded,
            configured = config.plugins.len(),
            "some plugins failed to load"
        );
    }

    let jobs = schedule(&host, &config.cron)?;
    info!(
        bot_id = config.bot_id,
        plugins = loaded,
        jobs = jobs.len(),
        events = host.catalog().len(),
        "host started"
    );
    Ok(host)
}

/// Schedule `entries`; every target must resolve to something callable
pub fn schedule(host: &Host, entries: &[CronEntry]) -> Result<Vec<JobId>> {
    entries
        .iter()
        .map(|entry| {
            if let Err(e) = validate(&entry.expression) {
                warn!(expression = %entry.expression, error = %e, "cron entry will never run");
            }
            let target = host.resolve(&entry.target)?.as_callable()?;
            if !target.responds_to(&entry.method) {
                return Err(Error::missing_method(&entry.target, &entry.method));
            }
            Ok(host.cron_add(
                &entry.expression,
                target,
                Some(&entry.method),
                entry.params.clone(),
            ))
        })
        .collect()
}

/// Parse an input line `<event> [json-args...]`, dispatch it and render the
/// outcome as JSON (`null` when the dispatch failed).
///
/// Blank lines and `#` comments yield `None`.
pub fn handle_line(host: &Host, line: &str) -> Result<Option<String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (event, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args = serde_json::Deserializer::from_str(rest)
        .into_iter::<Value>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(event, args = args.len(), "dispatching input line");
    let outcome = host.dispatch(event, &args);
    Ok(Some(serde_json::to_string(&outcome)?))
}

/// Minutes replayed after a gap; longer gaps only run the current minute
const MAX_CATCH_UP_MINUTES: i64 = 60;

/// Drives the cron scheduler and `onTick` from the clock.
///
/// Cron runs once for every wall-clock minute, however often the ticker
/// fires. Minutes skipped between two ticks are replayed in order.
#[derive(Debug, Clone)]
pub struct Ticker {
    utc: bool,
    last_minute: Option<i64>,
}

impl Ticker {
    pub fn new(utc: bool) -> Self {
        Self {
            utc,
            last_minute: None,
        }
    }

    /// Handle one clock tick at `now`; returns the cron summary when at
    /// least one new minute started
    pub fn tick(&mut self, host: &Host, now: DateTime<Utc>) -> Option<RunSummary> {
        let minute = now.timestamp().div_euclid(60);
        let first = match self.last_minute {
            Some(last) if last >= minute => None,
            Some(last) if minute - last <= MAX_CATCH_UP_MINUTES => Some(last + 1),
            _ => Some(minute),
        };

        let summary = first.map(|first| {
            self.last_minute = Some(minute);
            let mut summary = RunSummary::default();
            for m in first..=minute {
                let pass = self.run_minute(host, m);
                summary.fired.extend(pass.fired);
                summary.failed.extend(pass.failed);
            }
            debug!(
                minutes = minute - first + 1,
                fired = summary.fired.len(),
                failed = summary.failed.len(),
                "cron pass"
            );
            summary
        });

        host.dispatch(EVENT_TICK, &[Value::from(now.timestamp())]);
        summary
    }

    fn run_minute(&self, host: &Host, minute: i64) -> RunSummary {
        let Some(at) = DateTime::<Utc>::from_timestamp(minute * 60, 0) else {
            return RunSummary::default();
        };
        if self.utc {
            host.scheduler().run_at(&at)
        } else {
            host.scheduler().run_at(&at.with_timezone(&Local))
        }
    }
}
