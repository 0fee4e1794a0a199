use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::subscriptions;

/// One row per professional, created when the professional profile is
/// created and never deleted except by account deletion. The trial window
/// columns are fixed at creation; `status` is the coarse stored flag, the
/// finer lifecycle state is derived.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub current_plan_id: Option<Uuid>,
    pub selected_plan_id: Option<Uuid>,
    pub status: String,
    pub trial_start_date: DateTime<Utc>,
    pub trial_end_date: DateTime<Utc>,
    pub payment_data_required_date: DateTime<Utc>,
    pub next_billing_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub professional_id: Uuid,
    pub current_plan_id: Option<Uuid>,
    pub selected_plan_id: Option<Uuid>,
    pub status: String,
    pub trial_start_date: DateTime<Utc>,
    pub trial_end_date: DateTime<Utc>,
    pub payment_data_required_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
