//! Wiring & DI. Entry point: bootstrap adapters, inject into the runner, start the scheduler.
//! No business logic here; the decision rule lives in the domain.

use dotenv::dotenv;
use lawn_sensei::adapters::email::{MockMailAdapter, SendGridAdapter};
use lawn_sensei::adapters::observability::LogRunObserver;
use lawn_sensei::adapters::persistence::SqlitePlanStore;
use lawn_sensei::adapters::weather::OpenWeatherAdapter;
use lawn_sensei::ports::{AdvisoryJob, NotificationSender, PlanStore, RunObserver, WeatherClient};
use lawn_sensei::usecases::{AdvisoryRunner, Schedule, Scheduler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = lawn_sensei::shared::config::AppConfig::load().unwrap_or_default();

    let weather_api_key = cfg.weather_api_key().unwrap_or_default();
    if weather_api_key.is_empty() {
        anyhow::bail!(
            "Set LAWN_SENSEI_WEATHER_API_KEY (env or .env). Get from https://openweathermap.org/api"
        );
    }

    let data_dir = cfg.data_dir_or_default();
    let data_path = PathBuf::from(&data_dir);
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    // --- Plan store ---
    let plan_store = Arc::new(
        SqlitePlanStore::connect(&data_path)
            .await
            .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
    );
    let plans: Arc<dyn PlanStore> = plan_store;

    // --- Weather gateway ---
    let weather: Arc<dyn WeatherClient> = Arc::new(
        OpenWeatherAdapter::new(cfg.weather_api_url_or_default(), weather_api_key)
            .map_err(|e| anyhow::anyhow!("{}", e))?,
    );

    // --- Mail: real adapter when configured, otherwise log-only mock ---
    let mailer: Arc<dyn NotificationSender> = if cfg.is_mail_configured() {
        info!(
            url = %cfg.mail_api_url_or_default(),
            from = %cfg.mail_from().unwrap_or_default(),
            "mail delivery enabled with SendGrid adapter"
        );
        Arc::new(SendGridAdapter::new(
            cfg.mail_api_url_or_default(),
            cfg.mail_api_key().unwrap_or_default(),
            cfg.mail_from().unwrap_or_default(),
        ))
    } else {
        warn!("LAWN_SENSEI_MAIL_API_KEY / LAWN_SENSEI_MAIL_FROM not set, using mock mail adapter");
        Arc::new(MockMailAdapter::new())
    };

    let observer: Arc<dyn RunObserver> = Arc::new(LogRunObserver);

    // --- Runner ---
    let call_timeout = Duration::from_secs(cfg.call_timeout_secs_or_default());
    let runner = Arc::new(AdvisoryRunner::new(
        plans,
        weather,
        mailer,
        observer,
        call_timeout,
        cfg.max_concurrent_evaluations_or_default(),
    ));

    // --- Schedule: daily wall-clock run, or fixed interval when overridden ---
    let schedule = match cfg.run_every_secs {
        Some(secs) => {
            info!(secs, "interval schedule override active");
            Schedule::Every(Duration::from_secs(secs.max(1)))
        }
        None => {
            let hour = cfg.run_hour_or_default();
            let minute = cfg.run_minute_or_default();
            info!(hour, minute, "daily advisory schedule (UTC)");
            Schedule::daily_at(hour, minute)
        }
    };

    let scheduler = Arc::new(Scheduler::new(
        runner as Arc<dyn AdvisoryJob>,
        schedule,
        cfg.run_on_start_or_default(),
    ));
    let trigger_loop = scheduler.start();

    info!("lawn-sensei advisory daemon started; ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    // Halt future triggers, then let any in-flight run return to idle.
    scheduler.stop();
    let _ = trigger_loop.await;
    while scheduler.is_running() {
        info!("waiting for in-flight advisory run to finish");
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    info!("scheduler stopped; exiting");

    Ok(())
}
