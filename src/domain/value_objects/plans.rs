use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;

/// Numeric feature limit. Stored as `-1` (unlimited) or a non-negative count
/// in the plan's JSONB features, surfaced as a typed variant so call sites
/// cannot mix the sentinel up with a real count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureLimit {
    Unlimited,
    Limit(u32),
}

impl FeatureLimit {
    /// The usage gate: may one more unit be consumed given current usage?
    pub fn allows_one_more(&self, current_usage: u32) -> bool {
        match self {
            FeatureLimit::Unlimited => true,
            FeatureLimit::Limit(max) => current_usage < *max,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, FeatureLimit::Unlimited)
    }
}

impl Default for FeatureLimit {
    fn default() -> Self {
        FeatureLimit::Limit(0)
    }
}

impl Serialize for FeatureLimit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FeatureLimit::Unlimited => serializer.serialize_i64(-1),
            FeatureLimit::Limit(max) => serializer.serialize_i64(i64::from(*max)),
        }
    }
}

impl<'de> Deserialize<'de> for FeatureLimit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        if value < 0 {
            return Ok(FeatureLimit::Unlimited);
        }
        let max = u32::try_from(value)
            .map_err(|_| serde::de::Error::custom(format!("feature limit out of range: {value}")))?;
        Ok(FeatureLimit::Limit(max))
    }
}

/// Limits and feature flags attached to a plan. Stored as JSONB in the
/// `subscription_plans` table; missing keys fall back to the most restrictive
/// value via the accessors below.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PlanFeatures {
    #[serde(default)]
    pub max_contact_requests_per_month: Option<FeatureLimit>,

    #[serde(default)]
    pub max_work_photos: Option<FeatureLimit>,

    #[serde(default)]
    pub max_monthly_bookings: Option<FeatureLimit>,

    #[serde(default)]
    pub can_receive_messages: Option<bool>,

    #[serde(default)]
    pub can_send_files: Option<bool>,

    #[serde(default)]
    pub priority_support: Option<bool>,

    #[serde(default)]
    pub advanced_analytics: Option<bool>,

    #[serde(default)]
    pub featured_listing: Option<bool>,

    #[serde(default)]
    pub calendar_integration: Option<bool>,
}

impl PlanFeatures {
    pub fn contact_requests_per_month(&self) -> FeatureLimit {
        self.max_contact_requests_per_month.unwrap_or_default()
    }

    pub fn work_photos(&self) -> FeatureLimit {
        self.max_work_photos.unwrap_or_default()
    }

    pub fn monthly_bookings(&self) -> FeatureLimit {
        self.max_monthly_bookings.unwrap_or_default()
    }

    pub fn can_receive_messages(&self) -> bool {
        self.can_receive_messages.unwrap_or(false)
    }

    pub fn can_send_files(&self) -> bool {
        self.can_send_files.unwrap_or(false)
    }

    pub fn has_priority_support(&self) -> bool {
        self.priority_support.unwrap_or(false)
    }

    pub fn has_advanced_analytics(&self) -> bool {
        self.advanced_analytics.unwrap_or(false)
    }

    pub fn has_featured_listing(&self) -> bool {
        self.featured_listing.unwrap_or(false)
    }

    pub fn has_calendar_integration(&self) -> bool {
        self.calendar_integration.unwrap_or(false)
    }
}

/// In-memory view of the active plans, loaded once per request from the plan
/// repository. Lookup only; the catalog never mutates.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Vec<PlanEntity>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<PlanEntity>) -> Self {
        Self { plans }
    }

    pub fn find(&self, plan_id: Uuid) -> Option<&PlanEntity> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    /// The plan granted during trial, marked by `is_trial_reference` rather
    /// than by position in the list.
    pub fn trial_reference_plan(&self) -> Option<&PlanEntity> {
        self.plans
            .iter()
            .find(|plan| plan.is_trial_reference && plan.is_active)
    }

    pub fn plans(&self) -> &[PlanEntity] {
        &self.plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_allows_one_more() {
        for usage in [0, 1, 5, 1_000_000, u32::MAX] {
            assert!(FeatureLimit::Unlimited.allows_one_more(usage));
        }
    }

    #[test]
    fn limit_denies_at_exact_boundary() {
        assert!(FeatureLimit::Limit(5).allows_one_more(4));
        assert!(!FeatureLimit::Limit(5).allows_one_more(5));
        assert!(!FeatureLimit::Limit(5).allows_one_more(6));
    }

    #[test]
    fn zero_limit_denies_everything() {
        assert!(!FeatureLimit::Limit(0).allows_one_more(0));
    }

    #[test]
    fn negative_sentinel_deserializes_as_unlimited() {
        let limit: FeatureLimit = serde_json::from_str("-1").unwrap();
        assert_eq!(limit, FeatureLimit::Unlimited);

        let limit: FeatureLimit = serde_json::from_str("25").unwrap();
        assert_eq!(limit, FeatureLimit::Limit(25));
    }

    #[test]
    fn unlimited_serializes_back_to_sentinel() {
        assert_eq!(serde_json::to_string(&FeatureLimit::Unlimited).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&FeatureLimit::Limit(10)).unwrap(), "10");
    }

    #[test]
    fn missing_feature_keys_fall_back_to_restrictive_defaults() {
        let features: PlanFeatures = serde_json::from_str("{}").unwrap();

        assert_eq!(features.contact_requests_per_month(), FeatureLimit::Limit(0));
        assert_eq!(features.work_photos(), FeatureLimit::Limit(0));
        assert_eq!(features.monthly_bookings(), FeatureLimit::Limit(0));
        assert!(!features.can_receive_messages());
        assert!(!features.has_priority_support());
        assert!(!features.has_advanced_analytics());
    }

    #[test]
    fn features_parse_from_plan_jsonb_shape() {
        let features: PlanFeatures = serde_json::from_str(
            r#"{
                "max_contact_requests_per_month": -1,
                "max_work_photos": 20,
                "can_receive_messages": true
            }"#,
        )
        .unwrap();

        assert_eq!(
            features.contact_requests_per_month(),
            FeatureLimit::Unlimited
        );
        assert_eq!(features.work_photos(), FeatureLimit::Limit(20));
        assert!(features.can_receive_messages());
        assert!(!features.can_send_files());
    }
}
