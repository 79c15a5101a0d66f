//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, LawnPlan, RunSummary, WeatherReading};

/// Plan store. Source of the per-run plan snapshot.
#[async_trait::async_trait]
pub trait PlanStore: Send + Sync {
    /// Fetch all active lawn plans with owner contact info.
    ///
    /// Called once at the start of a run; the core never writes plans.
    /// Failure here aborts the whole pass (no partial evaluation is possible
    /// without a plan list).
    async fn list_active_plans(&self) -> Result<Vec<LawnPlan>, DomainError>;
}

/// Weather provider gateway. Resolves current conditions at coordinates.
#[async_trait::async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch the current weather classification at the given location.
    /// Readings are per-plan and per-run; implementations must not cache.
    async fn current_conditions(&self, lat: f64, lng: f64)
        -> Result<WeatherReading, DomainError>;
}

/// Notification dispatch. Delivers one advisory message to one owner.
#[async_trait::async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send `body` to `to` under `subject`. One call per plan per run;
    /// failed deliveries are not retried within the same run.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError>;
}

/// Observability sink for run results.
///
/// Best-effort: implementations log or forward the summary but must never
/// block or fail the run that produced it.
#[async_trait::async_trait]
pub trait RunObserver: Send + Sync {
    /// Record the outcome of one completed advisory pass.
    async fn record_run(&self, summary: &RunSummary);
}
