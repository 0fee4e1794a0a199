mod alerts;
mod config;
mod layer;

use alerts::{AlertDispatcher, DiscordWebhookProvider};
use anyhow::Result;
use config::ObservabilityConfig;
use layer::AlertLayer;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub fn init_observability() -> Result<()> {
    let config = ObservabilityConfig::from_env();

    let alert_layer = match config.alerts.as_ref() {
        Some(alerts) => {
            let provider = DiscordWebhookProvider::new(alerts.webhook_url.clone())?;
            let dispatcher = AlertDispatcher::new(vec![Arc::new(provider)]);

            Some(
                AlertLayer::new(
                    dispatcher,
                    config.service_context.clone(),
                    alerts.min_level,
                )
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(
                    alerts.min_level,
                )),
            )
        }
        None => None,
    };

    // RUST_LOG overrides; default stays at info so production is not flooded.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(alert_layer)
        .with(env_filter)
        .try_init()?;

    for warning in &config.warnings {
        warn!(
            service = %config.service_context.service_name,
            environment = %config.service_context.environment,
            warning = %warning,
            "Observability config warning"
        );
    }

    if config.alerts.is_some() {
        info!(
            service = %config.service_context.service_name,
            environment = %config.service_context.environment,
            "Discord error alerts enabled"
        );
    } else {
        info!(
            service = %config.service_context.service_name,
            environment = %config.service_context.environment,
            "Discord error alerts disabled"
        );
    }

    Ok(())
}
