//! Tracing-backed run observer. Emits run summaries as structured log events.

use crate::domain::{OutcomeStatus, RunSummary};
use crate::ports::RunObserver;
use tracing::{info, warn};

/// Run observer that records outcomes to the process log.
pub struct LogRunObserver;

#[async_trait::async_trait]
impl RunObserver for LogRunObserver {
    async fn record_run(&self, summary: &RunSummary) {
        let duration_ms = (summary.finished_at - summary.started_at)
            .num_milliseconds()
            .max(0);
        info!(
            plans = summary.plans_total(),
            notified = summary.notified(),
            failed = summary.failed(),
            duration_ms,
            "run outcome recorded"
        );

        for outcome in summary.outcomes.iter().filter(|o| o.is_failure()) {
            match &outcome.status {
                OutcomeStatus::WeatherFailed(detail) => {
                    warn!(plan_id = %outcome.plan_id, detail, "plan skipped: weather unavailable");
                }
                OutcomeStatus::DeliveryFailed(recommendation, detail) => {
                    warn!(
                        plan_id = %outcome.plan_id,
                        recommendation = ?recommendation,
                        detail,
                        "plan advisory not delivered"
                    );
                }
                OutcomeStatus::Notified(_) => {}
            }
        }
    }
}
