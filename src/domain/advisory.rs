//! Advisory decision rule. Pure function from a weather reading to a recommendation.
//!
//! No side effects, no I/O.

use crate::domain::entities::{AdvisoryDecision, Recommendation, WeatherReading};

/// Message sent when precipitation is expected.
pub const SKIP_WATERING_MESSAGE: &str = "Dear user, it is expected to rain today in your area. You do not need to water your lawn today.";

/// Message sent when no rain is expected.
pub const WATER_NOW_MESSAGE: &str =
    "Dear user, we recommend watering your lawn today as no rain is expected.";

/// Subject line for all advisory notifications.
pub const NOTIFICATION_SUBJECT: &str = "Lawn Care Notification";

/// Map a weather reading to today's watering advisory.
///
/// Total over every condition: precipitation means skip, everything else
/// (including unrecognized provider groups) means water. Unknown conditions
/// deliberately fall on the water side so a provider quirk degrades into a
/// harmless extra watering reminder rather than a missed one.
pub fn evaluate(reading: &WeatherReading) -> AdvisoryDecision {
    if reading.condition.is_precipitation() {
        AdvisoryDecision {
            recommendation: Recommendation::SkipWatering,
            message: SKIP_WATERING_MESSAGE,
        }
    } else {
        AdvisoryDecision {
            recommendation: Recommendation::WaterNow,
            message: WATER_NOW_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::WeatherCondition;

    fn reading(condition: WeatherCondition) -> WeatherReading {
        WeatherReading { condition }
    }

    #[test]
    fn precipitation_means_skip() {
        for c in [
            WeatherCondition::Rain,
            WeatherCondition::Drizzle,
            WeatherCondition::Thunderstorm,
            WeatherCondition::Snow,
        ] {
            let decision = evaluate(&reading(c));
            assert_eq!(decision.recommendation, Recommendation::SkipWatering);
            assert_eq!(decision.message, SKIP_WATERING_MESSAGE);
        }
    }

    #[test]
    fn dry_conditions_mean_water() {
        for c in [
            WeatherCondition::Clear,
            WeatherCondition::Clouds,
            WeatherCondition::Atmosphere,
        ] {
            let decision = evaluate(&reading(c));
            assert_eq!(decision.recommendation, Recommendation::WaterNow);
            assert_eq!(decision.message, WATER_NOW_MESSAGE);
        }
    }

    #[test]
    fn unknown_condition_defaults_to_water() {
        let decision = evaluate(&reading(WeatherCondition::Unknown));
        assert_eq!(decision.recommendation, Recommendation::WaterNow);
    }

    #[test]
    fn evaluate_is_deterministic() {
        let r = reading(WeatherCondition::Rain);
        assert_eq!(evaluate(&r), evaluate(&r));
    }

    #[test]
    fn messages_do_not_overlap() {
        assert!(!SKIP_WATERING_MESSAGE.contains("recommend watering"));
        assert!(!WATER_NOW_MESSAGE.contains("do not need to water"));
    }
}
