use serde::Serialize;

use crate::domain::entities::plans::PlanEntity;
use crate::domain::value_objects::plans::FeatureLimit;
use crate::domain::value_objects::usage::LimitedFeature;

/// Concrete feature set in effect for a professional. Derived, never
/// persisted. `fail_closed()` is the answer whenever a plan lookup fails so a
/// data-integrity problem can only ever remove access, not grant it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entitlements {
    pub max_contact_requests_per_month: FeatureLimit,
    pub max_work_photos: FeatureLimit,
    pub max_monthly_bookings: FeatureLimit,
    pub can_receive_messages: bool,
    pub can_send_files: bool,
    pub priority_support: bool,
    pub advanced_analytics: bool,
    pub featured_listing: bool,
    pub calendar_integration: bool,
    pub is_full_access: bool,
}

impl Entitlements {
    pub fn fail_closed() -> Self {
        Self {
            max_contact_requests_per_month: FeatureLimit::Limit(0),
            max_work_photos: FeatureLimit::Limit(0),
            max_monthly_bookings: FeatureLimit::Limit(0),
            can_receive_messages: false,
            can_send_files: false,
            priority_support: false,
            advanced_analytics: false,
            featured_listing: false,
            calendar_integration: false,
            is_full_access: false,
        }
    }

    pub fn from_plan(plan: &PlanEntity, is_full_access: bool) -> Self {
        let features = &plan.features;
        Self {
            max_contact_requests_per_month: features.contact_requests_per_month(),
            max_work_photos: features.work_photos(),
            max_monthly_bookings: features.monthly_bookings(),
            can_receive_messages: features.can_receive_messages(),
            can_send_files: features.can_send_files(),
            priority_support: features.has_priority_support(),
            advanced_analytics: features.has_advanced_analytics(),
            featured_listing: features.has_featured_listing(),
            calendar_integration: features.has_calendar_integration(),
            is_full_access,
        }
    }

    pub fn limit_for(&self, feature: LimitedFeature) -> FeatureLimit {
        match feature {
            LimitedFeature::ContactRequest => self.max_contact_requests_per_month,
            LimitedFeature::WorkPhoto => self.max_work_photos,
            LimitedFeature::Booking => self.max_monthly_bookings,
        }
    }
}

impl Default for Entitlements {
    fn default() -> Self {
        Self::fail_closed()
    }
}
