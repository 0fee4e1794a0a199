use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::plans::PlanFeatures,
    infra::db::postgres::schema::subscription_plans,
};

#[derive(Debug, Clone)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: Option<String>,
    pub price_minor: i32,
    pub currency: String,
    pub billing_interval_days: i32,
    pub grace_period_days: i32,
    pub features: PlanFeatures,
    pub is_trial_reference: bool,
    pub is_active: bool,
}

/// Raw row used for Diesel queries. Features stay as JSON and are parsed into
/// PlanFeatures on the way out; a malformed blob degrades to the restrictive
/// defaults instead of failing the whole query.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub price_minor: i32,
    pub currency: String,
    pub billing_interval_days: i32,
    pub grace_period_days: i32,
    pub features: serde_json::Value,
    pub is_trial_reference: bool,
    pub is_active: bool,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let features = serde_json::from_value(value.features).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            currency: value.currency,
            billing_interval_days: value.billing_interval_days,
            grace_period_days: value.grace_period_days,
            features,
            is_trial_reference: value.is_trial_reference,
            is_active: value.is_active,
        }
    }
}
