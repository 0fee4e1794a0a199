use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;
use crate::domain::value_objects::enums::{
    lifecycle_states::LifecycleState, subscription_statuses::SubscriptionStatus,
};
use crate::domain::value_objects::entitlements::Entitlements;
use crate::domain::value_objects::plans::{FeatureLimit, PlanFeatures};
use crate::domain::value_objects::usage::{LimitedFeature, UsageSnapshot};

#[derive(Debug, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub price_minor: i32,
    pub currency: String,
    pub billing_interval_days: i32,
    pub features: PlanFeatures,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            currency: value.currency,
            billing_interval_days: value.billing_interval_days,
            features: value.features,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentSubscriptionDto {
    pub status: SubscriptionStatus,
    pub lifecycle_state: LifecycleState,
    pub current_plan_id: Option<Uuid>,
    pub selected_plan_id: Option<Uuid>,
    pub trial_start_date: DateTime<Utc>,
    pub trial_end_date: DateTime<Utc>,
    pub payment_data_required_date: DateTime<Utc>,
    pub next_billing_date: Option<DateTime<Utc>>,
    pub trial_days_remaining: i64,
}

#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    pub plan_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BillingConfirmationRequest {
    pub professional_id: Uuid,
    pub plan_id: Uuid,
    pub next_billing_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EntitlementSummaryDto {
    pub lifecycle_state: LifecycleState,
    pub entitlements: Entitlements,
    pub usage: UsageSnapshot,
    pub trial_days_remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct FeatureCheckDto {
    pub feature: LimitedFeature,
    pub allowed: bool,
    pub current_usage: u32,
    pub limit: FeatureLimit,
}
