//! Application configuration. API credentials, schedule, paths.

use serde::Deserialize;

/// Default hour (UTC) for the daily advisory run, matching the product's
/// original 6 a.m. watering check.
pub const DEFAULT_RUN_HOUR: u32 = 6;

/// Default bound on each outbound call in seconds.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 10;

/// Default cap on concurrent per-plan evaluations.
pub const DEFAULT_MAX_CONCURRENT_EVALUATIONS: usize = 4;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Base directory for the plan database. Read from LAWN_SENSEI_DATA_DIR.
    pub data_dir: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Weather Provider Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// OpenWeatherMap API key. Read from LAWN_SENSEI_WEATHER_API_KEY.
    #[serde(default)]
    pub weather_api_key: Option<String>,

    /// Weather API URL. Defaults to the OpenWeatherMap current-weather
    /// endpoint. Read from LAWN_SENSEI_WEATHER_API_URL.
    #[serde(default)]
    pub weather_api_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Mail Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Mail API key. Read from LAWN_SENSEI_MAIL_API_KEY.
    #[serde(default)]
    pub mail_api_key: Option<String>,

    /// Mail API URL. Defaults to the SendGrid mail send endpoint.
    /// Read from LAWN_SENSEI_MAIL_API_URL.
    #[serde(default)]
    pub mail_api_url: Option<String>,

    /// Verified sender address. Read from LAWN_SENSEI_MAIL_FROM.
    #[serde(default)]
    pub mail_from: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Schedule Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// UTC hour of the daily run (default 6). Read from LAWN_SENSEI_RUN_HOUR.
    #[serde(default)]
    pub run_hour: Option<u32>,

    /// UTC minute of the daily run (default 0). Read from LAWN_SENSEI_RUN_MINUTE.
    #[serde(default)]
    pub run_minute: Option<u32>,

    /// Interval override in seconds; replaces the daily schedule when set.
    /// Read from LAWN_SENSEI_RUN_EVERY_SECS.
    #[serde(default)]
    pub run_every_secs: Option<u64>,

    /// Fire one advisory run immediately at startup. Read from
    /// LAWN_SENSEI_RUN_ON_START.
    #[serde(default)]
    pub run_on_start: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Run Tuning
    // ─────────────────────────────────────────────────────────────────────────
    /// Timeout in seconds for each outbound call (plan fetch, weather, send).
    /// Read from LAWN_SENSEI_CALL_TIMEOUT_SECS.
    #[serde(default)]
    pub call_timeout_secs: Option<u64>,

    /// Max concurrent per-plan evaluations. Read from
    /// LAWN_SENSEI_MAX_CONCURRENT_EVALUATIONS.
    #[serde(default)]
    pub max_concurrent_evaluations: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("LAWN_SENSEI"));
        if let Ok(path) = std::env::var("LAWN_SENSEI_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let cfg: Self = c.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Returns the data directory. Defaults to ./data.
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    /// Returns the weather API key if configured.
    pub fn weather_api_key(&self) -> Option<String> {
        self.weather_api_key
            .clone()
            .or_else(|| std::env::var("LAWN_SENSEI_WEATHER_API_KEY").ok())
    }

    /// Returns the weather API URL. Defaults to the OpenWeatherMap
    /// current-weather endpoint.
    pub fn weather_api_url_or_default(&self) -> String {
        self.weather_api_url
            .clone()
            .unwrap_or_else(|| "https://api.openweathermap.org/data/2.5/weather".to_string())
    }

    /// Returns the mail API key if configured.
    pub fn mail_api_key(&self) -> Option<String> {
        self.mail_api_key
            .clone()
            .or_else(|| std::env::var("LAWN_SENSEI_MAIL_API_KEY").ok())
    }

    /// Returns the mail API URL. Defaults to the SendGrid mail send endpoint.
    pub fn mail_api_url_or_default(&self) -> String {
        self.mail_api_url
            .clone()
            .unwrap_or_else(|| "https://api.sendgrid.com/v3/mail/send".to_string())
    }

    /// Returns the sender address if configured.
    pub fn mail_from(&self) -> Option<String> {
        self.mail_from
            .clone()
            .or_else(|| std::env::var("LAWN_SENSEI_MAIL_FROM").ok())
    }

    /// Returns true if mail delivery is fully configured (key + sender).
    pub fn is_mail_configured(&self) -> bool {
        self.mail_api_key().is_some() && self.mail_from().is_some()
    }

    /// Returns the daily run hour (UTC). Defaults to 6.
    pub fn run_hour_or_default(&self) -> u32 {
        self.run_hour.unwrap_or(DEFAULT_RUN_HOUR)
    }

    /// Returns the daily run minute. Defaults to 0.
    pub fn run_minute_or_default(&self) -> u32 {
        self.run_minute.unwrap_or(0)
    }

    /// Returns whether to fire a run at startup. Defaults to false.
    pub fn run_on_start_or_default(&self) -> bool {
        self.run_on_start.unwrap_or(false)
    }

    /// Returns the per-call timeout in seconds. Defaults to 10.
    pub fn call_timeout_secs_or_default(&self) -> u64 {
        self.call_timeout_secs.unwrap_or(DEFAULT_CALL_TIMEOUT_SECS)
    }

    /// Returns the evaluation concurrency cap. Defaults to 4.
    pub fn max_concurrent_evaluations_or_default(&self) -> usize {
        self.max_concurrent_evaluations
            .unwrap_or(DEFAULT_MAX_CONCURRENT_EVALUATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_schedule() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.run_hour_or_default(), 6);
        assert_eq!(cfg.run_minute_or_default(), 0);
        assert!(!cfg.run_on_start_or_default());
        assert_eq!(cfg.call_timeout_secs_or_default(), 10);
        assert_eq!(cfg.max_concurrent_evaluations_or_default(), 4);
        assert_eq!(cfg.data_dir_or_default(), "./data");
    }
}
