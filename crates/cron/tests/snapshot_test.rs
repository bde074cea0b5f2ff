//! A pass works on the job list as it was when the pass started.

use cerberus_core::{Callable, JobId, Result, Value};
use cerberus_cron::Scheduler;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Records its calls and mutates the scheduler from inside a pass.
struct Meddler {
    me: Weak<Meddler>,
    scheduler: Weak<Scheduler>,
    victim: Mutex<Option<JobId>>,
    added: Mutex<Vec<JobId>>,
    calls: Mutex<Vec<String>>,
}

impl Meddler {
    fn new(scheduler: &Arc<Scheduler>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            scheduler: Arc::downgrade(scheduler),
            victim: Mutex::new(None),
            added: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl Callable for Meddler {
    fn name(&self) -> &str {
        "meddler"
    }

    fn responds_to(&self, method: &str) -> bool {
        matches!(method, "meddle" | "run")
    }

    fn call(&self, method: &str, _args: &[Value]) -> Result<Value> {
        self.calls.lock().push(method.to_string());
        if method == "meddle" {
            if let (Some(scheduler), Some(me)) = (self.scheduler.upgrade(), self.me.upgrade()) {
                if let Some(victim) = self.victim.lock().take() {
                    scheduler.remove(victim);
                }
                let id = scheduler.add("* * * * *", me);
                self.added.lock().push(id);
            }
        }
        Ok(Value::Null)
    }
}

#[test]
fn jobs_removed_mid_pass_still_run_and_jobs_added_mid_pass_wait() {
    let scheduler = Arc::new(Scheduler::new());
    let meddler = Meddler::new(&scheduler);

    let first = scheduler.add_with("* * * * *", meddler.clone(), "meddle", None);
    let victim = scheduler.add("* * * * *", meddler.clone());
    *meddler.victim.lock() = Some(victim);

    let summary = scheduler.run(0, 0, 1, 1, 1);
    assert_eq!(summary.fired, vec![first, victim]);
    assert_eq!(*meddler.calls.lock(), vec!["meddle", "run"]);

    let added = meddler.added.lock()[0];
    assert!(added > victim);
    let ids: Vec<JobId> = scheduler.jobs().iter().map(|job| job.id).collect();
    assert_eq!(ids, vec![first, added]);

    // The second pass no longer sees the victim but does run the new job.
    meddler.calls.lock().clear();
    let summary = scheduler.run(0, 0, 1, 1, 1);
    assert_eq!(summary.fired, vec![first, added]);
    assert_eq!(*meddler.calls.lock(), vec!["meddle", "run"]);
}
