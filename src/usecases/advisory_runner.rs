//! One full advisory pass: fetch plans -> per-plan weather/decide/notify -> summary.
//!
//! - Plan snapshot comes from PlanStore once per run; a fetch failure aborts the pass
//! - Each plan is evaluated independently; weather or delivery failures are
//!   recorded per plan and never abort the rest of the run
//! - Every outbound call is bounded by a timeout
//! - Fan-out is capped by a semaphore so the weather/mail collaborators are
//!   never hit with unlimited concurrent calls

use crate::domain::advisory::{self, NOTIFICATION_SUBJECT};
use crate::domain::{DomainError, LawnPlan, OutcomeStatus, RunOutcome, RunSummary};
use crate::ports::{AdvisoryJob, NotificationSender, PlanStore, RunObserver, WeatherClient};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Default cap on concurrent per-plan evaluations.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Advisory runner. Coordinates the plan store, weather provider, and
/// notification sender for one scheduled pass.
pub struct AdvisoryRunner {
    plans: Arc<dyn PlanStore>,
    weather: Arc<dyn WeatherClient>,
    mailer: Arc<dyn NotificationSender>,
    observer: Arc<dyn RunObserver>,
    call_timeout: Duration,
    max_concurrent: usize,
}

impl AdvisoryRunner {
    pub fn new(
        plans: Arc<dyn PlanStore>,
        weather: Arc<dyn WeatherClient>,
        mailer: Arc<dyn NotificationSender>,
        observer: Arc<dyn RunObserver>,
        call_timeout: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self {
            plans,
            weather,
            mailer,
            observer,
            call_timeout,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Execute one pass over all active plans.
    ///
    /// Returns the run summary, or a run-level error when the plan snapshot
    /// itself could not be fetched (zero notifications in that case).
    pub async fn run(&self) -> Result<RunSummary, DomainError> {
        let started_at = Utc::now();

        let plans = match tokio::time::timeout(self.call_timeout, self.plans.list_active_plans())
            .await
        {
            Ok(res) => res?,
            Err(_) => {
                return Err(DomainError::Store(format!(
                    "plan fetch timed out after {:?}",
                    self.call_timeout
                )));
            }
        };

        info!(plans = plans.len(), "starting advisory pass");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        for plan in plans {
            let sem = Arc::clone(&semaphore);
            let weather = Arc::clone(&self.weather);
            let mailer = Arc::clone(&self.mailer);
            let call_timeout = self.call_timeout;
            tasks.spawn(async move {
                // Semaphore is never closed while tasks hold it.
                let _permit = sem.acquire().await.expect("semaphore closed");
                Self::evaluate_plan(&*weather, &*mailer, call_timeout, &plan).await
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(error = %e, "plan evaluation task failed to complete"),
            }
        }

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        info!(
            plans = summary.plans_total(),
            notified = summary.notified(),
            failed = summary.failed(),
            "advisory pass complete"
        );

        // Best-effort: the observer never fails the run.
        self.observer.record_run(&summary).await;

        Ok(summary)
    }

    /// Evaluate a single plan: weather -> decide -> notify, strictly in order.
    /// All failures are absorbed into the returned outcome.
    async fn evaluate_plan(
        weather: &dyn WeatherClient,
        mailer: &dyn NotificationSender,
        call_timeout: Duration,
        plan: &LawnPlan,
    ) -> RunOutcome {
        let reading = match tokio::time::timeout(
            call_timeout,
            weather.current_conditions(plan.location.lat, plan.location.lng),
        )
        .await
        {
            Ok(Ok(reading)) => reading,
            Ok(Err(e)) => {
                warn!(plan_id = %plan.id, error = %e, "weather fetch failed; skipping plan");
                return RunOutcome {
                    plan_id: plan.id.clone(),
                    status: OutcomeStatus::WeatherFailed(e.to_string()),
                };
            }
            Err(_) => {
                warn!(plan_id = %plan.id, "weather fetch timed out; skipping plan");
                return RunOutcome {
                    plan_id: plan.id.clone(),
                    status: OutcomeStatus::WeatherFailed(format!(
                        "weather fetch timed out after {:?}",
                        call_timeout
                    )),
                };
            }
        };

        let decision = advisory::evaluate(&reading);

        let delivery = match tokio::time::timeout(
            call_timeout,
            mailer.send(&plan.owner_email, NOTIFICATION_SUBJECT, decision.message),
        )
        .await
        {
            Ok(res) => res,
            Err(_) => Err(DomainError::Delivery(format!(
                "notification send timed out after {:?}",
                call_timeout
            ))),
        };

        match delivery {
            Ok(()) => {
                info!(
                    plan_id = %plan.id,
                    condition = ?reading.condition,
                    recommendation = ?decision.recommendation,
                    "advisory delivered"
                );
                RunOutcome {
                    plan_id: plan.id.clone(),
                    status: OutcomeStatus::Notified(decision.recommendation),
                }
            }
            Err(e) => {
                // No retry within the run; the next scheduled window covers it.
                warn!(plan_id = %plan.id, error = %e, "notification delivery failed");
                RunOutcome {
                    plan_id: plan.id.clone(),
                    status: OutcomeStatus::DeliveryFailed(decision.recommendation, e.to_string()),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl AdvisoryJob for AdvisoryRunner {
    async fn run(&self) -> Result<RunSummary, DomainError> {
        AdvisoryRunner::run(self).await
    }
}
