//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by the scheduler into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;

pub use inbound::AdvisoryJob;
pub use outbound::{NotificationSender, PlanStore, RunObserver, WeatherClient};
