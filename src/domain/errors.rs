//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Plan store failure: run-level. A pass cannot proceed without the plan list.
    #[error("Plan store error: {0}")]
    Store(String),

    /// Weather provider failure: plan-level, isolated to the affected plan.
    #[error("Weather provider error: {0}")]
    Weather(String),

    /// Notification delivery failure: plan-level, isolated to the affected plan.
    #[error("Notification delivery error: {0}")]
    Delivery(String),
}
