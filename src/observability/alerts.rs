use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Level, warn};
use url::Url;

#[derive(Clone, Debug)]
pub(crate) struct AlertEvent {
    pub(crate) level: Level,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) target: String,
    pub(crate) file: Option<String>,
    pub(crate) line: Option<u32>,
    pub(crate) message: Option<String>,
    pub(crate) fields: BTreeMap<String, String>,
}

#[async_trait]
pub(crate) trait AlertProvider: Send + Sync {
    async fn send(&self, event: &AlertEvent) -> Result<()>;
    fn provider_name(&self) -> &'static str;
}

/// Fans alert events out to the configured providers from a bounded queue so
/// a slow webhook can never stall request handling.
#[derive(Clone)]
pub(crate) struct AlertDispatcher {
    tx: mpsc::Sender<AlertEvent>,
}

impl AlertDispatcher {
    pub(crate) fn new(providers: Vec<Arc<dyn AlertProvider>>) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertEvent>(256);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                for provider in &providers {
                    if let Err(error) = provider.send(&event).await {
                        warn!(
                            provider = provider.provider_name(),
                            error = %error,
                            "Alert provider failed"
                        );
                    }
                }
            }
        });

        Self { tx }
    }

    pub(crate) fn try_dispatch(&self, event: AlertEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Alert queue full; dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Alert queue closed; dropping event");
            }
        }
    }
}

pub(crate) struct DiscordWebhookProvider {
    webhook_url: Url,
    client: Client,
}

impl DiscordWebhookProvider {
    pub(crate) fn new(webhook_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(3))
            .build()?;

        Ok(Self {
            webhook_url,
            client,
        })
    }

    fn format_content(&self, event: &AlertEvent) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "**{}** `{}` `{}`",
            event.service_name,
            event.environment,
            event.level.as_str()
        ));

        let location = match (&event.file, event.line) {
            (Some(file), Some(line)) => format!(" `{}:{}`", file, line),
            _ => String::new(),
        };
        lines.push(format!(
            "`{}` `{}`{}",
            event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            event.target,
            location
        ));

        if let Some(message) = event.message.as_ref().filter(|m| !m.trim().is_empty()) {
            lines.push(format!("> {}", message.trim()));
        }

        for (key, value) in &event.fields {
            lines.push(format!("- `{}` = `{}`", key, value));
        }

        truncate_for_discord(lines.join("\n"))
    }
}

#[async_trait]
impl AlertProvider for DiscordWebhookProvider {
    async fn send(&self, event: &AlertEvent) -> Result<()> {
        let content = self.format_content(event);

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "discord webhook returned non-success status: {}",
            response.status()
        ))
    }

    fn provider_name(&self) -> &'static str {
        "discord"
    }
}

// Request errors can embed the webhook URL, which is a secret.
fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("discord webhook request timed out");
    }
    if error.is_connect() {
        return anyhow!("discord webhook connection failed");
    }
    anyhow!("discord webhook request failed")
}

fn truncate_for_discord(content: String) -> String {
    const LIMIT: usize = 2000;
    const SUFFIX: &str = "\n… (truncated)";

    if content.chars().count() <= LIMIT {
        return content;
    }

    let allowed = LIMIT.saturating_sub(SUFFIX.chars().count());
    let mut truncated: String = content.chars().take(allowed).collect();
    truncated.push_str(SUFFIX);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_the_discord_limit() {
        let long = "x".repeat(5000);
        let truncated = truncate_for_discord(long);
        assert!(truncated.chars().count() <= 2000);
        assert!(truncated.ends_with("… (truncated)"));
    }

    #[test]
    fn short_content_is_untouched() {
        let content = "all good".to_string();
        assert_eq!(truncate_for_discord(content.clone()), content);
    }
}
