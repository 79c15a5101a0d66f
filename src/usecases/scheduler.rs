//! Scheduler use case: triggers the advisory job on a fixed cadence.
//!
//! Two states while alive: Idle (waiting for the next trigger) and Running
//! (a pass is executing). A trigger that fires while Running is dropped, not
//! queued — an overlapping pass would double-notify users. The trigger loop
//! itself never executes the job; runs go to a spawned task so the loop stays
//! responsive to `stop()`.

use crate::ports::AdvisoryJob;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Trigger cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Fire once per day at the given UTC wall-clock time.
    DailyAt { hour: u32, minute: u32 },
    /// Fire on a fixed interval. Operational/testing override.
    Every(Duration),
}

impl Schedule {
    /// Daily schedule with hour/minute clamped into valid wall-clock range.
    pub fn daily_at(hour: u32, minute: u32) -> Self {
        Self::DailyAt {
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// Next fire time strictly after `now`.
    pub fn next_fire(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            Self::DailyAt { hour, minute } => {
                let today = now.date_naive().and_hms_opt(hour, minute, 0);
                let today = match today {
                    Some(naive) => Utc.from_utc_datetime(&naive),
                    // Unreachable with clamped hour/minute; fall back to a day.
                    None => return now + ChronoDuration::days(1),
                };
                if today > now {
                    today
                } else {
                    today + ChronoDuration::days(1)
                }
            }
            Self::Every(interval) => {
                now + ChronoDuration::from_std(interval).unwrap_or(ChronoDuration::seconds(1))
            }
        }
    }
}

/// Scheduler. Owns the trigger loop lifecycle; `stop()` halts future triggers
/// without interrupting an in-flight run.
pub struct Scheduler {
    job: Arc<dyn AdvisoryJob>,
    schedule: Schedule,
    run_on_start: bool,
    running: Arc<AtomicBool>,
    stop_tx: watch::Sender<bool>,
}

impl Scheduler {
    pub fn new(job: Arc<dyn AdvisoryJob>, schedule: Schedule, run_on_start: bool) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            job,
            schedule,
            run_on_start,
            running: Arc::new(AtomicBool::new(false)),
            stop_tx,
        }
    }

    /// Spawn the trigger loop. The returned handle completes after `stop()`.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.trigger_loop().await })
    }

    /// Halt future triggers immediately. An in-flight run completes on its
    /// own; poll `is_running()` to wait for Idle.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// True while a pass is executing.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn trigger_loop(&self) {
        let mut stop_rx = self.stop_tx.subscribe();
        if *stop_rx.borrow() {
            return;
        }

        if self.run_on_start {
            info!("run_on_start set; firing initial advisory run");
            self.fire();
        }

        loop {
            let now = Utc::now();
            let next = self.schedule.next_fire(now);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(next = %next, "next advisory trigger scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => self.fire(),
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        info!("scheduler stopped; no further triggers");
                        return;
                    }
                }
            }
        }
    }

    /// Handle one trigger: drop it if a run is still in flight, otherwise
    /// transition Idle -> Running and execute the job in a supervised task.
    fn fire(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("previous advisory run still in progress; dropping trigger");
            return;
        }

        let job = Arc::clone(&self.job);
        let running = Arc::clone(&self.running);
        // The job runs in its own task; the supervisor observes its handle so
        // a run error or panic is contained and Running always returns to Idle.
        let run = tokio::spawn(async move { job.run().await });
        tokio::spawn(async move {
            match run.await {
                Ok(Ok(summary)) => debug!(
                    notified = summary.notified(),
                    failed = summary.failed(),
                    "scheduled run finished"
                ),
                Ok(Err(e)) => error!(error = %e, "advisory run failed; waiting for next window"),
                Err(e) => error!(error = %e, "advisory run aborted; waiting for next window"),
            }
            running.store(false, Ordering::SeqCst);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, RunSummary};
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, 0)
                .unwrap(),
        )
    }

    #[test]
    fn daily_schedule_fires_later_today_when_time_not_passed() {
        let s = Schedule::daily_at(6, 0);
        assert_eq!(
            s.next_fire(utc(2026, 8, 7, 5, 0)),
            utc(2026, 8, 7, 6, 0)
        );
    }

    #[test]
    fn daily_schedule_rolls_to_tomorrow_when_time_passed() {
        let s = Schedule::daily_at(6, 0);
        assert_eq!(
            s.next_fire(utc(2026, 8, 7, 6, 0)),
            utc(2026, 8, 8, 6, 0)
        );
        assert_eq!(
            s.next_fire(utc(2026, 8, 7, 23, 30)),
            utc(2026, 8, 8, 6, 0)
        );
    }

    #[test]
    fn daily_schedule_clamps_out_of_range_wall_clock() {
        assert_eq!(
            Schedule::daily_at(99, 99),
            Schedule::DailyAt {
                hour: 23,
                minute: 59
            }
        );
    }

    /// Counts runs; each run holds Running for `run_for`.
    struct CountingJob {
        runs: AtomicUsize,
        run_for: Duration,
        fail: bool,
    }

    impl CountingJob {
        fn new(run_for: Duration) -> Self {
            Self {
                runs: AtomicUsize::new(0),
                run_for,
                fail: false,
            }
        }

        fn count(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AdvisoryJob for CountingJob {
        async fn run(&self) -> Result<RunSummary, DomainError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.run_for).await;
            if self.fail {
                return Err(DomainError::Store("snapshot unavailable".into()));
            }
            Ok(RunSummary {
                started_at: Utc::now(),
                finished_at: Utc::now(),
                outcomes: Vec::new(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn triggers_during_a_run_are_dropped_not_queued() {
        // Job takes 10 intervals to finish; every trigger in between must drop.
        let job = Arc::new(CountingJob::new(Duration::from_millis(1000)));
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&job) as Arc<dyn AdvisoryJob>,
            Schedule::Every(Duration::from_millis(100)),
            false,
        ));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(550)).await;
        assert_eq!(job.count(), 1);
        assert!(scheduler.is_running());

        scheduler.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_returns_to_idle_and_fires_again() {
        let job = Arc::new(CountingJob::new(Duration::from_millis(10)));
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&job) as Arc<dyn AdvisoryJob>,
            Schedule::Every(Duration::from_millis(100)),
            false,
        ));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(job.count() >= 3);

        scheduler.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_future_triggers() {
        let job = Arc::new(CountingJob::new(Duration::from_millis(1)));
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&job) as Arc<dyn AdvisoryJob>,
            Schedule::Every(Duration::from_millis(100)),
            false,
        ));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop();
        handle.await.unwrap();
        let after_stop = job.count();
        assert!(after_stop >= 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(job.count(), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_run_does_not_stop_the_trigger_loop() {
        let job = Arc::new(CountingJob {
            runs: AtomicUsize::new(0),
            run_for: Duration::from_millis(1),
            fail: true,
        });
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&job) as Arc<dyn AdvisoryJob>,
            Schedule::Every(Duration::from_millis(100)),
            false,
        ));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(job.count() >= 2);
        assert!(!scheduler.is_running());

        scheduler.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn run_on_start_fires_immediately() {
        let job = Arc::new(CountingJob::new(Duration::from_millis(1)));
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&job) as Arc<dyn AdvisoryJob>,
            Schedule::Every(Duration::from_secs(3600)),
            true,
        ));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(job.count(), 1);

        scheduler.stop();
        handle.await.unwrap();
    }
}
