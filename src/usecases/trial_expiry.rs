use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use crate::domain::repositories::subscriptions::SubscriptionRepository;

/// Periodic sweep that moves lapsed trials to `expired`. The stored status is
/// only a cache of what the lifecycle resolver already derives from the trial
/// window, so a missed sweep never grants access; it only delays the stored
/// flag catching up.
pub struct TrialExpiryUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
}

impl<S> TrialExpiryUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>) -> Self {
        Self { subscription_repo }
    }

    pub async fn run_once(&self, now: chrono::DateTime<Utc>) -> Result<usize> {
        let expired = self.subscription_repo.expire_lapsed_trials(now).await?;

        if expired > 0 {
            info!(expired, "trial_expiry: lapsed trials marked expired");
        }

        Ok(expired)
    }

    /// Runs the sweep forever on a fixed interval. Errors are logged and the
    /// loop keeps going; the next tick retries.
    pub async fn run_loop(self: Arc<Self>, interval_secs: u64) {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            ticker.tick().await;

            if let Err(err) = self.run_once(Utc::now()).await {
                error!(error = ?err, "trial_expiry: sweep failed");
            }
        }
    }
}
