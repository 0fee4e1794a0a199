use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    async fn find_by_professional_id(
        &self,
        professional_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn create_trial_subscription(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    async fn set_selected_plan(
        &self,
        professional_id: Uuid,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<()>;

    async fn activate_after_billing(
        &self,
        professional_id: Uuid,
        plan_id: Uuid,
        next_billing_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Marks every trial whose window lapsed before `now` as expired and
    /// returns how many rows changed.
    async fn expire_lapsed_trials(&self, now: DateTime<Utc>) -> Result<usize>;
}
