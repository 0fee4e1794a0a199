use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        enums::subscription_statuses::SubscriptionStatus,
        subscriptions::{CurrentSubscriptionDto, PlanDto},
    },
};
use crate::usecases::lifecycle::{
    PAYMENT_DATA_REQUIRED_AFTER_DAYS, TRIAL_LENGTH_DAYS, resolve_lifecycle_state,
    trial_days_remaining,
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("no subscription record for professional")]
    SubscriptionNotFound,
    #[error("subscription already exists")]
    TrialAlreadyStarted,
    #[error("plan selection is closed once the subscription left the trial")]
    PlanSelectionClosed,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::PlanNotFound | SubscriptionError::SubscriptionNotFound => {
                StatusCode::NOT_FOUND
            }
            SubscriptionError::TrialAlreadyStarted | SubscriptionError::PlanSelectionClosed => {
                StatusCode::CONFLICT
            }
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
}

impl<P, S> SubscriptionUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, subscription_repo: Arc<S>) -> Self {
        Self {
            plan_repo,
            subscription_repo,
        }
    }

    pub async fn list_plans(&self) -> UseCaseResult<Vec<PlanDto>> {
        let plans = self.plan_repo.list_active_plans().await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to list active plans");
            SubscriptionError::Internal(err)
        })?;

        info!(plan_count = plans.len(), "subscriptions: active plans loaded");
        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    pub async fn get_current_subscription(
        &self,
        professional_id: Uuid,
        now: DateTime<Utc>,
    ) -> UseCaseResult<Option<CurrentSubscriptionDto>> {
        let record = self.load_record(professional_id).await?;

        Ok(record.map(|record| Self::to_dto(record, now)))
    }

    /// Creates the subscription record at professional-profile creation time.
    /// The trial window is fixed here and never moves afterwards.
    pub async fn start_trial(
        &self,
        professional_id: Uuid,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CurrentSubscriptionDto> {
        if self.load_record(professional_id).await?.is_some() {
            let err = SubscriptionError::TrialAlreadyStarted;
            warn!(
                %professional_id,
                status = err.status_code().as_u16(),
                "subscriptions: trial already started"
            );
            return Err(err);
        }

        let insert = InsertSubscriptionEntity {
            professional_id,
            current_plan_id: None,
            selected_plan_id: None,
            status: SubscriptionStatus::Trial.to_string(),
            trial_start_date: now,
            trial_end_date: now + Duration::days(TRIAL_LENGTH_DAYS),
            payment_data_required_date: now + Duration::days(PAYMENT_DATA_REQUIRED_AFTER_DAYS),
            created_at: now,
            updated_at: now,
        };

        let record = self
            .subscription_repo
            .create_trial_subscription(insert)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    db_error = ?err,
                    "subscriptions: failed to create trial subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %professional_id,
            trial_end_date = %record.trial_end_date,
            "subscriptions: trial started"
        );

        Ok(Self::to_dto(record, now))
    }

    /// Records which plan should take effect once the trial resolves. Allowed
    /// any time before the subscription leaves the trial phase.
    pub async fn select_plan(
        &self,
        professional_id: Uuid,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> UseCaseResult<()> {
        self.plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    %plan_id,
                    db_error = ?err,
                    "subscriptions: failed to load plan for selection"
                );
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = SubscriptionError::PlanNotFound;
                warn!(
                    %professional_id,
                    %plan_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: selected plan does not exist"
                );
                err
            })?;

        let record = self
            .load_record(professional_id)
            .await?
            .ok_or_else(|| {
                let err = SubscriptionError::SubscriptionNotFound;
                warn!(
                    %professional_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: no record to select a plan on"
                );
                err
            })?;

        let state = resolve_lifecycle_state(Some(&record), now);
        if !state.allows_plan_selection() {
            let err = SubscriptionError::PlanSelectionClosed;
            warn!(
                %professional_id,
                %plan_id,
                lifecycle_state = %state,
                status = err.status_code().as_u16(),
                "subscriptions: plan selection rejected"
            );
            return Err(err);
        }

        self.subscription_repo
            .set_selected_plan(professional_id, plan_id, now)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    %plan_id,
                    db_error = ?err,
                    "subscriptions: failed to persist selected plan"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(%professional_id, %plan_id, "subscriptions: plan selected");
        Ok(())
    }

    /// Billing-confirmation event from the payments side: the subscription
    /// becomes `active` on the confirmed plan with a known next billing date.
    pub async fn confirm_billing(
        &self,
        professional_id: Uuid,
        plan_id: Uuid,
        next_billing_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> UseCaseResult<()> {
        self.plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    %plan_id,
                    db_error = ?err,
                    "subscriptions: failed to load plan for billing confirmation"
                );
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = SubscriptionError::PlanNotFound;
                warn!(
                    %professional_id,
                    %plan_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: billing confirmation for unknown plan"
                );
                err
            })?;

        if self.load_record(professional_id).await?.is_none() {
            let err = SubscriptionError::SubscriptionNotFound;
            warn!(
                %professional_id,
                status = err.status_code().as_u16(),
                "subscriptions: billing confirmation without a record"
            );
            return Err(err);
        }

        self.subscription_repo
            .activate_after_billing(professional_id, plan_id, next_billing_date, now)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    %plan_id,
                    db_error = ?err,
                    "subscriptions: failed to activate after billing"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %professional_id,
            %plan_id,
            next_billing_date = %next_billing_date,
            "subscriptions: activated after billing confirmation"
        );
        Ok(())
    }

    async fn load_record(
        &self,
        professional_id: Uuid,
    ) -> UseCaseResult<Option<SubscriptionEntity>> {
        self.subscription_repo
            .find_by_professional_id(professional_id)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    db_error = ?err,
                    "subscriptions: failed to load subscription record"
                );
                SubscriptionError::Internal(err)
            })
    }

    fn to_dto(record: SubscriptionEntity, now: DateTime<Utc>) -> CurrentSubscriptionDto {
        let lifecycle_state = resolve_lifecycle_state(Some(&record), now);
        let trial_days = trial_days_remaining(&record, now);

        CurrentSubscriptionDto {
            status: SubscriptionStatus::from_str(&record.status),
            lifecycle_state,
            current_plan_id: record.current_plan_id,
            selected_plan_id: record.selected_plan_id,
            trial_start_date: record.trial_start_date,
            trial_end_date: record.trial_end_date,
            payment_data_required_date: record.payment_data_required_date,
            next_billing_date: record.next_billing_date,
            trial_days_remaining: trial_days,
        }
    }
}
