use tracing::Level;
use url::Url;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
}

#[derive(Clone)]
pub(crate) struct AlertConfig {
    pub(crate) webhook_url: Url,
    pub(crate) min_level: Level,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) alerts: Option<AlertConfig>,
    /// Warnings collected while parsing, logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env() -> Self {
        let service_name = env_string("SERVICE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "chequealo-backend".to_string());

        let environment = env_string("STAGE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let (alerts, warnings) = alerts_from_env();

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
            },
            alerts,
            warnings,
        }
    }
}

fn alerts_from_env() -> (Option<AlertConfig>, Vec<String>) {
    let mut warnings = Vec::new();

    let enabled = env_bool("DISCORD_NOTIFY_ENABLED").unwrap_or(true);
    if !enabled {
        return (None, warnings);
    }

    let webhook_url = match env_string("DISCORD_WEBHOOK_URL").filter(|v| !v.is_empty()) {
        Some(raw) => match Url::parse(&raw) {
            Ok(url) => url,
            Err(err) => {
                // Webhook URLs carry a secret; never echo the raw value.
                warnings.push(format!(
                    "DISCORD_WEBHOOK_URL is set but invalid; alerts disabled (parse error: {err})"
                ));
                return (None, warnings);
            }
        },
        None => return (None, warnings),
    };

    let min_level = match env_string("DISCORD_MIN_LEVEL") {
        Some(raw) => match raw.to_ascii_lowercase().parse::<Level>() {
            Ok(level) => level,
            Err(_) => {
                warnings.push(format!(
                    "DISCORD_MIN_LEVEL '{raw}' is not a log level; using ERROR"
                ));
                Level::ERROR
            }
        },
        None => Level::ERROR,
    };

    (
        Some(AlertConfig {
            webhook_url,
            min_level,
        }),
        warnings,
    )
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string())
}

fn env_bool(key: &str) -> Option<bool> {
    env_string(key).and_then(|v| match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}
