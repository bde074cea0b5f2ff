//! Event fan-out through the host

use cerberus_core::{Callable, Error, Priority, Result, Value};
use cerberus_engine::testing::{call_log, CallLog, MemoryLogger, RecordingPlugin};
use cerberus_engine::{Host, HostBuilder};
use serde_json::json;
use std::sync::Arc;

fn privmsg(_: &Host, args: &[Value]) -> Result<Value> {
    Ok(json!({ "handled": args.len() }))
}

fn broken(_: &Host, _: &[Value]) -> Result<Value> {
    Err(Error::handler("event.onKick", "handle", "cannot kick"))
}

fn builder(logger: &Arc<MemoryLogger>) -> HostBuilder {
    Host::builder()
        .logger(logger.clone())
        .handler("onPrivmsg", |_| Ok(privmsg))
        .unwrap()
        .handler("onKick", |_| Ok(broken))
        .unwrap()
}

fn with_plugins(builder: HostBuilder, plugins: &[RecordingPlugin]) -> Arc<Host> {
    let mut builder = builder;
    for plugin in plugins {
        let plugin = plugin.clone();
        let name = Callable::name(&plugin).to_string();
        builder = builder.plugin(&name, move |_| Ok(plugin.clone())).unwrap();
    }
    builder.build()
}

fn calls(log: &CallLog) -> Vec<String> {
    log.lock().clone()
}

#[test]
fn catalog_holds_handlers_and_native_events() {
    let logger = Arc::new(MemoryLogger::new());
    let host = builder(&logger)
        .handler("join", |_| Ok(privmsg))
        .unwrap()
        .build();

    let events: Vec<&str> = host.catalog().iter().map(|e| e.as_str()).collect();
    assert_eq!(
        events,
        vec!["onConnect", "onDisconnect", "onKick", "onPrivmsg", "onShutdown", "onTick"]
    );
    assert!(!host.catalog().contains("join"));
}

#[test]
fn subscriptions_run_from_highest_priority() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[
            RecordingPlugin::new("low", &log).on("onPrivmsg", None, 1),
            RecordingPlugin::new("high", &log).on("onPrivmsg", None, 10),
            RecordingPlugin::new("mid", &log).on("onPrivmsg", None, 5),
            RecordingPlugin::new("mid2", &log).on("onPrivmsg", None, 5),
        ],
    );
    assert_eq!(host.load_plugins(&["low", "high", "mid", "mid2"]), 4);
    assert_eq!(host.dispatcher().subscription_count("onPrivmsg"), 4);

    let outcome = host
        .dispatch("onPrivmsg", &[json!("#rust"), json!("hello")])
        .unwrap();
    assert_eq!(
        calls(&log),
        vec!["high.onPrivmsg", "mid.onPrivmsg", "mid2.onPrivmsg", "low.onPrivmsg"]
    );
    assert_eq!(outcome.builtin, Some(json!({ "handled": 2 })));
    assert_eq!(outcome.plugins.len(), 4);
    assert_eq!(outcome.plugins[0]["plugin"], "high");
    assert_eq!(outcome.plugins[0]["args"], json!(["#rust", "hello"]));
    assert!(logger.is_empty());
}

#[test]
fn events_without_handler_still_reach_plugins() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[RecordingPlugin::new("ticker", &log).on("onTick", Some("tick"), 5)],
    );
    host.load_plugins(&["ticker"]);

    let outcome = host.dispatch("onTick", &[]).unwrap();
    assert_eq!(outcome.builtin, None);
    assert_eq!(calls(&log), vec!["ticker.tick"]);
}

#[test]
fn unknown_events_are_rejected() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[RecordingPlugin::new("lost", &log).on("onNothing", None, 5)],
    );

    // Subscribing fails without touching the table.
    host.load_plugins(&["lost"]);
    assert_eq!(host.dispatcher().subscription_count("onNothing"), 0);
    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].context["event"], "onNothing");
    assert_eq!(entries[0].context["method"], "onNothing");

    let subscriber = host.resolve("lost").unwrap().as_callable().unwrap();
    assert!(matches!(
        host.subscribe("onNothing", &subscriber, None, Priority::default()),
        Err(Error::UnknownEvent { .. })
    ));

    // Dispatching fails as well.
    assert!(matches!(
        host.try_dispatch("onNothing", &[]),
        Err(Error::UnknownEvent { .. })
    ));
    assert!(host.dispatch("onNothing", &[json!(1)]).is_none());
    let last = logger.entries().pop().unwrap();
    assert_eq!(last.context["name"], "onNothing");
    assert_eq!(last.context["arguments"], json!([1]));
    assert!(calls(&log).is_empty());
}

#[test]
fn subscribing_requires_the_method() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[RecordingPlugin::new("mute", &log).on_unanswered("onPrivmsg", "reply")],
    );
    host.load_plugins(&["mute"]);

    assert_eq!(host.dispatcher().subscription_count("onPrivmsg"), 0);
    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].context["method"], "reply");

    let subscriber = host.resolve("mute").unwrap().as_callable().unwrap();
    assert!(matches!(
        host.subscribe("onPrivmsg", &subscriber, Some("reply"), Priority::default()),
        Err(Error::MissingMethod { ref method, .. }) if method == "reply"
    ));
}

#[test]
fn invalid_priority_is_logged_and_skipped() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[RecordingPlugin::new("eager", &log)
            .on("onPrivmsg", None, 11)
            .on("onTick", None, 0)],
    );
    host.load_plugins(&["eager"]);

    assert_eq!(host.dispatcher().subscription_count("onPrivmsg"), 0);
    assert_eq!(host.dispatcher().subscription_count("onTick"), 0);
    assert_eq!(logger.len(), 2);
}

#[test]
fn first_failure_aborts_the_dispatch() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[
            RecordingPlugin::new("first", &log).on("onPrivmsg", None, 9),
            RecordingPlugin::new("faulty", &log)
                .on("onPrivmsg", None, 5)
                .failing_on("onPrivmsg"),
            RecordingPlugin::new("last", &log).on("onPrivmsg", None, 1),
        ],
    );
    host.load_plugins(&["first", "faulty", "last"]);

    assert!(host.dispatch("onPrivmsg", &[json!("x")]).is_none());
    assert_eq!(calls(&log), vec!["first.onPrivmsg", "faulty.onPrivmsg"]);

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].context["name"], "onPrivmsg");
    assert_eq!(entries[0].context["arguments"], json!(["x"]));

    assert!(matches!(
        host.try_dispatch("onPrivmsg", &[]),
        Err(Error::Handler { ref component, .. }) if component == "faulty"
    ));
}

#[test]
fn failing_builtin_skips_every_plugin() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[RecordingPlugin::new("bystander", &log).on("onKick", None, 10)],
    );
    host.load_plugins(&["bystander"]);

    assert!(host.dispatch("onKick", &[]).is_none());
    assert!(calls(&log).is_empty());
    assert_eq!(logger.len(), 1);
}

#[test]
fn unsubscribed_plugins_are_not_called() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = with_plugins(
        builder(&logger),
        &[
            RecordingPlugin::new("stays", &log).on("onTick", None, 5),
            RecordingPlugin::new("leaves", &log)
                .on("onTick", None, 5)
                .on("onTick", Some("again"), 2),
        ],
    );
    host.load_plugins(&["stays", "leaves"]);

    let leaving = host.resolve("leaves").unwrap().as_callable().unwrap();
    assert_eq!(host.unsubscribe("onTick", &leaving), 2);
    assert_eq!(host.unsubscribe("onTick", &leaving), 0);

    host.dispatch("onTick", &[]).unwrap();
    assert_eq!(calls(&log), vec!["stays.onTick"]);
}

#[test]
fn dropped_subscribers_are_skipped() {
    let log = call_log();
    let logger = Arc::new(MemoryLogger::new());
    let host = builder(&logger).build();

    let transient: Arc<dyn Callable> =
        Arc::new(RecordingPlugin::new("transient", &log).with_method("onTick"));
    host.subscribe("onTick", &transient, None, Priority::MAX)
        .unwrap();
    assert_eq!(host.dispatcher().subscription_count("onTick"), 1);
    drop(transient);

    let outcome = host.dispatch("onTick", &[]).unwrap();
    assert!(outcome.plugins.is_empty());
    assert!(calls(&log).is_empty());
    assert_eq!(host.dispatcher().subscription_count("onTick"), 0);
}
