//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here — these are mapped from adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque lawn plan identifier. Assigned by the store that owns plan CRUD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub String);

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Geographic coordinates of a lawn area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A registered lawn-care plan. Read-only snapshot for the advisory pass;
/// creation and mutation happen outside this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawnPlan {
    pub id: PlanId,
    /// Notification target for the owning user.
    pub owner_email: String,
    pub location: Coordinates,
}

/// Current weather at a plan's location. Fetched fresh per plan per run,
/// never cached across plans or runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub condition: WeatherCondition,
}

/// Weather condition groups as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    /// Fog, mist, haze and similar obscurations.
    Atmosphere,
    Clear,
    Clouds,
    /// Provider returned a group outside the known set.
    Unknown,
}

impl WeatherCondition {
    /// Parse a provider condition group (e.g. OpenWeatherMap `weather[0].main`).
    /// Unrecognized groups map to `Unknown`, not an error.
    pub fn from_provider_group(group: &str) -> Self {
        match group.to_ascii_lowercase().as_str() {
            "thunderstorm" => Self::Thunderstorm,
            "drizzle" => Self::Drizzle,
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" | "squall"
            | "tornado" => Self::Atmosphere,
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            _ => Self::Unknown,
        }
    }

    /// True when the condition means precipitation is expected today.
    pub fn is_precipitation(self) -> bool {
        matches!(
            self,
            Self::Thunderstorm | Self::Drizzle | Self::Rain | Self::Snow
        )
    }
}

/// Daily recommendation for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    SkipWatering,
    WaterNow,
}

/// Recommendation plus the message text sent to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryDecision {
    pub recommendation: Recommendation,
    pub message: &'static str,
}

/// Terminal status of one plan's evaluation within a run.
#[derive(Debug, Clone)]
pub enum OutcomeStatus {
    /// Weather resolved, decision made, notification delivered.
    Notified(Recommendation),
    /// Weather fetch failed; no decision, no notification.
    WeatherFailed(String),
    /// Decision made but the notification could not be delivered.
    DeliveryFailed(Recommendation, String),
}

/// Per-plan result, kept for observability only. Never persisted by the core.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub plan_id: PlanId,
    pub status: OutcomeStatus,
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self.status, OutcomeStatus::Notified(_))
    }
}

/// Result of one full advisory pass over all plans.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<RunOutcome>,
}

impl RunSummary {
    pub fn plans_total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn notified(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_group_parses_known_groups() {
        assert_eq!(
            WeatherCondition::from_provider_group("Rain"),
            WeatherCondition::Rain
        );
        assert_eq!(
            WeatherCondition::from_provider_group("clear"),
            WeatherCondition::Clear
        );
        assert_eq!(
            WeatherCondition::from_provider_group("Mist"),
            WeatherCondition::Atmosphere
        );
    }

    #[test]
    fn provider_group_unknown_falls_through() {
        assert_eq!(
            WeatherCondition::from_provider_group("Meteor Shower"),
            WeatherCondition::Unknown
        );
    }

    #[test]
    fn precipitation_covers_all_wet_groups() {
        for c in [
            WeatherCondition::Thunderstorm,
            WeatherCondition::Drizzle,
            WeatherCondition::Rain,
            WeatherCondition::Snow,
        ] {
            assert!(c.is_precipitation());
        }
        for c in [
            WeatherCondition::Atmosphere,
            WeatherCondition::Clear,
            WeatherCondition::Clouds,
            WeatherCondition::Unknown,
        ] {
            assert!(!c.is_precipitation());
        }
    }

    #[test]
    fn summary_counts_split_by_outcome() {
        let summary = RunSummary {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            outcomes: vec![
                RunOutcome {
                    plan_id: PlanId("a".into()),
                    status: OutcomeStatus::Notified(Recommendation::WaterNow),
                },
                RunOutcome {
                    plan_id: PlanId("b".into()),
                    status: OutcomeStatus::WeatherFailed("boom".into()),
                },
                RunOutcome {
                    plan_id: PlanId("c".into()),
                    status: OutcomeStatus::DeliveryFailed(
                        Recommendation::SkipWatering,
                        "smtp down".into(),
                    ),
                },
            ],
        };
        assert_eq!(summary.plans_total(), 3);
        assert_eq!(summary.notified(), 1);
        assert_eq!(summary.failed(), 2);
    }
}
