use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

/// Usage counting lives in the data-access layer; the entitlement core only
/// ever sees the resulting counts.
#[async_trait]
#[automock]
pub trait UsageRepository {
    async fn count_contact_requests_since(
        &self,
        professional_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64>;

    async fn count_work_photos(&self, professional_id: Uuid) -> Result<i64>;

    async fn count_bookings_since(
        &self,
        professional_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64>;
}
