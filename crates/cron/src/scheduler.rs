//! The job list and the per-minute pass over it

use crate::schedule::{normalize, Schedule};
use cerberus_core::{
    log_context, Callable, Error, JobId, Logger, Result, TimeTuple, TracingLogger, Value,
    DEFAULT_CRON_METHOD,
};
use chrono::{DateTime, TimeZone};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, debug_span};

struct Job {
    id: JobId,
    expression: String,
    target: Arc<dyn Callable>,
    method: String,
    params: Option<Value>,
}

impl Job {
    // Parsed on every pass so that a malformed job only ever fails itself.
    fn fire_if_due(&self, at: &TimeTuple) -> Result<bool> {
        let schedule = Schedule::parse(&self.expression)?;
        if !schedule.matches(at) {
            return Ok(false);
        }
        let params = self.params.clone().unwrap_or(Value::Null);
        self.target.call(&self.method, std::slice::from_ref(&params))?;
        Ok(true)
    }
}

/// Read-only view of a scheduled job
#[derive(Debug, Clone, PartialEq)]
pub struct JobInfo {
    pub id: JobId,
    pub expression: String,
    pub target: String,
    pub method: String,
    pub params: Option<Value>,
}

/// Outcome of a single [`Scheduler::run`] pass
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Jobs whose schedule matched and whose target returned normally
    pub fired: Vec<JobId>,
    /// Jobs that could not be parsed or whose target failed
    pub failed: Vec<(JobId, Error)>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Holds time-triggered jobs and fires the ones matching a supplied time.
///
/// Ids start at 1 and are never reused. Each pass works on a snapshot of the
/// job list taken when the pass starts: a job added by a target during the
/// pass waits for the next one, and a job removed during the pass still
/// completes the current one.
pub struct Scheduler {
    jobs: RwLock<IndexMap<JobId, Arc<Job>>>,
    last_id: AtomicU64,
    logger: Arc<dyn Logger>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingLogger))
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            jobs: RwLock::new(IndexMap::new()),
            last_id: AtomicU64::new(0),
            logger,
        }
    }

    /// Schedule `target.run(null)`
    pub fn add(&self, expression: &str, target: Arc<dyn Callable>) -> JobId {
        self.add_with(expression, target, DEFAULT_CRON_METHOD, None)
    }

    /// Schedule `target.method(params)`.
    ///
    /// The expression is only normalized here; it is parsed when a pass
    /// evaluates it.
    pub fn add_with(
        &self,
        expression: &str,
        target: Arc<dyn Callable>,
        method: &str,
        params: Option<Value>,
    ) -> JobId {
        let id = JobId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let job = Job {
            id,
            expression: normalize(expression),
            target,
            method: method.to_string(),
            params,
        };
        debug!(job_id = %id, cron = %job.expression, target = job.target.name(), method, "cron job added");
        self.jobs.write().insert(id, Arc::new(job));
        id
    }

    /// Remove a job; `false` if no job had that id
    pub fn remove(&self, id: JobId) -> bool {
        let removed = self.jobs.write().shift_remove(&id).is_some();
        if removed {
            debug!(job_id = %id, "cron job removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    pub fn jobs(&self) -> Vec<JobInfo> {
        self.jobs
            .read()
            .values()
            .map(|job| JobInfo {
                id: job.id,
                expression: job.expression.clone(),
                target: job.target.name().to_string(),
                method: job.method.clone(),
                params: job.params.clone(),
            })
            .collect()
    }

    /// Run every job due at the given minute
    pub fn run(
        &self,
        minute: u32,
        hour: u32,
        day_of_month: u32,
        month: u32,
        day_of_week: u32,
    ) -> RunSummary {
        self.run_tuple(TimeTuple::new(minute, hour, day_of_month, month, day_of_week))
    }

    /// Run every job due at the wall-clock minute of `at`
    pub fn run_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> RunSummary {
        self.run_tuple(TimeTuple::from(at))
    }

    pub fn run_tuple(&self, at: TimeTuple) -> RunSummary {
        let _span = debug_span!("cron_run", time = %at).entered();
        let snapshot: Vec<Arc<Job>> = self.jobs.read().values().cloned().collect();

        let mut summary = RunSummary::default();
        for job in snapshot {
            match job.fire_if_due(&at) {
                Ok(true) => {
                    debug!(job_id = %job.id, method = %job.method, "cron job fired");
                    summary.fired.push(job.id);
                }
                Ok(false) => {}
                Err(e) => {
                    self.logger.error(
                        &e.to_string(),
                        &log_context([
                            ("id", Value::from(job.id.get())),
                            ("cron", Value::from(job.expression.as_str())),
                            ("method", Value::from(job.method.as_str())),
                        ]),
                    );
                    summary.failed.push((job.id, e));
                }
            }
        }
        summary
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerberus_core::MemoryLogger;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl Callable for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn responds_to(&self, method: &str) -> bool {
            method != "missing"
        }

        fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
            if method == "explode" {
                return Err(Error::handler("recorder", method, "exploded"));
            }
            self.calls
                .lock()
                .push((method.to_string(), args.first().cloned().unwrap_or_default()));
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_ids_strictly_increase() {
        let scheduler = Scheduler::new();
        let target = Arc::new(Recorder::default());
        let first = scheduler.add("* * * * *", target.clone());
        let second = scheduler.add("* * * * *", target.clone());
        assert!(scheduler.remove(second));
        let third = scheduler.add("* * * * *", target);
        assert_eq!(first.get(), 1);
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_remove_missing_id() {
        let scheduler = Scheduler::new();
        assert!(!scheduler.remove(JobId::new(42)));
        let id = scheduler.add("* * * * *", Arc::new(Recorder::default()));
        assert!(scheduler.remove(id));
        assert!(!scheduler.remove(id));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_run_passes_params_to_method() {
        let scheduler = Scheduler::new();
        let target = Arc::new(Recorder::default());
        scheduler.add_with(
            "*/15 * * * *",
            target.clone(),
            "announce",
            Some(Value::from("#cerberus")),
        );
        scheduler.add("0 0 * * *", target.clone());

        let summary = scheduler.run(15, 3, 1, 1, 1);
        assert_eq!(summary.fired, vec![JobId::new(1)]);
        assert!(summary.is_clean());

        let summary = scheduler.run(0, 0, 1, 1, 1);
        assert_eq!(summary.fired, vec![JobId::new(1), JobId::new(2)]);

        let calls = target.calls.lock().clone();
        assert_eq!(
            calls,
            vec![
                ("announce".to_string(), Value::from("#cerberus")),
                ("announce".to_string(), Value::from("#cerberus")),
                ("run".to_string(), Value::Null),
            ]
        );
    }

    #[test]
    fn test_malformed_job_does_not_stop_the_pass() {
        let logger = Arc::new(MemoryLogger::new());
        let scheduler = Scheduler::with_logger(logger.clone());
        let target = Arc::new(Recorder::default());
        let broken = scheduler.add("* * *", target.clone());
        let bad_field = scheduler.add("61 * * * *", target.clone());
        let failing = scheduler.add_with("* * * * *", target.clone(), "explode", None);
        let good = scheduler.add("* * * * *", target.clone());

        let summary = scheduler.run(5, 5, 5, 5, 5);
        assert_eq!(summary.fired, vec![good]);
        let failed: Vec<JobId> = summary.failed.iter().map(|(id, _)| *id).collect();
        assert_eq!(failed, vec![broken, bad_field, failing]);
        assert!(matches!(
            summary.failed[0].1,
            Error::InvalidCronExpression { fields: 3, .. }
        ));
        assert!(matches!(summary.failed[1].1, Error::CronMatch { .. }));
        assert!(matches!(summary.failed[2].1, Error::Handler { .. }));

        let entries = logger.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].context["cron"], Value::from("* * *"));
        assert_eq!(target.calls.lock().len(), 1);
    }

    #[test]
    fn test_jobs_lists_normalized_expressions() {
        let scheduler = Scheduler::new();
        scheduler.add_with(
            " 0  12 * *  mon ",
            Arc::new(Recorder::default()),
            "report",
            None,
        );
        let jobs = scheduler.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].expression, "0 12 * * mon");
        assert_eq!(jobs[0].target, "recorder");
        assert_eq!(jobs[0].method, "report");
    }
}
