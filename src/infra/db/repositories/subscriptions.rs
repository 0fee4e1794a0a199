use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};
use crate::infra::db::postgres::{postgres_connection::PgPool, schema::subscriptions};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPool>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_by_professional_id(
        &self,
        professional_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let record = subscriptions::table
            .filter(subscriptions::professional_id.eq(professional_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(record)
    }

    async fn create_trial_subscription(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let record = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(record)
    }

    async fn set_selected_plan(
        &self,
        professional_id: Uuid,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table)
            .filter(subscriptions::professional_id.eq(professional_id))
            .set((
                subscriptions::selected_plan_id.eq(Some(plan_id)),
                subscriptions::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn activate_after_billing(
        &self,
        professional_id: Uuid,
        plan_id: Uuid,
        next_billing_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table)
            .filter(subscriptions::professional_id.eq(professional_id))
            .set((
                subscriptions::status.eq(SubscriptionStatus::Active.to_string()),
                subscriptions::current_plan_id.eq(Some(plan_id)),
                subscriptions::next_billing_date.eq(Some(next_billing_date)),
                subscriptions::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn expire_lapsed_trials(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let expired = update(subscriptions::table)
            .filter(subscriptions::status.eq(SubscriptionStatus::Trial.to_string()))
            .filter(subscriptions::trial_end_date.lt(now))
            .set((
                subscriptions::status.eq(SubscriptionStatus::Expired.to_string()),
                subscriptions::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(expired)
    }
}
