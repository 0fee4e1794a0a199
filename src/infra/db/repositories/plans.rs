use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::plans::{PlanEntity, PlanRow},
    repositories::plans::PlanRepository,
};
use crate::infra::db::postgres::{postgres_connection::PgPool, schema::subscription_plans};

pub struct PlanPostgres {
    db_pool: Arc<PgPool>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_active_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscription_plans::table
            .filter(subscription_plans::id.eq(plan_id))
            .filter(subscription_plans::is_active.eq(true))
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = subscription_plans::table
            .filter(subscription_plans::is_active.eq(true))
            .select(PlanRow::as_select())
            .load::<PlanRow>(&mut conn)?;

        Ok(rows.into_iter().map(PlanEntity::from).collect())
    }
}
