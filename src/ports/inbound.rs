//! Inbound port. The scheduler (driver) calls into the application.

use crate::domain::{DomainError, RunSummary};

/// One complete advisory pass, triggered on a schedule.
#[async_trait::async_trait]
pub trait AdvisoryJob: Send + Sync {
    /// Evaluate every active plan and dispatch notifications.
    /// Plan-level failures are absorbed into the summary; only a run-level
    /// failure (plan snapshot unavailable) surfaces as an error.
    async fn run(&self) -> Result<RunSummary, DomainError>;
}
