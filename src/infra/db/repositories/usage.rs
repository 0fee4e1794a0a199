use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::usage::UsageRepository;
use crate::infra::db::postgres::{
    postgres_connection::PgPool,
    schema::{bookings, contact_requests, work_photos},
};

pub struct UsagePostgres {
    db_pool: Arc<PgPool>,
}

impl UsagePostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UsageRepository for UsagePostgres {
    async fn count_contact_requests_since(
        &self,
        professional_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = contact_requests::table
            .filter(contact_requests::professional_id.eq(professional_id))
            .filter(contact_requests::created_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn count_work_photos(&self, professional_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = work_photos::table
            .filter(work_photos::professional_id.eq(professional_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn count_bookings_since(
        &self,
        professional_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = bookings::table
            .filter(bookings::professional_id.eq(professional_id))
            .filter(bookings::created_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }
}
