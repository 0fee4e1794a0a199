use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    repositories::{
        plans::PlanRepository, subscriptions::SubscriptionRepository, usage::UsageRepository,
    },
    value_objects::{
        entitlements::Entitlements,
        enums::lifecycle_states::LifecycleState,
        plans::PlanCatalog,
        subscriptions::{EntitlementSummaryDto, FeatureCheckDto},
        usage::{LimitedFeature, UsageSnapshot, month_start},
    },
};
use crate::usecases::lifecycle::{resolve_lifecycle_state, trial_days_remaining};

/// Resolves the concrete feature set in effect for a lifecycle state.
///
/// During `trial` and `payment_reminder` every professional gets the catalog's
/// trial-reference plan with full access, regardless of which plan they
/// selected for later. In every other state the selected plan wins over the
/// currently billed one, and any failed lookup degrades to the fail-closed
/// set rather than erroring.
pub fn resolve_entitlements(
    state: &LifecycleState,
    record: Option<&SubscriptionEntity>,
    catalog: &PlanCatalog,
) -> Entitlements {
    if state.is_full_access() {
        return match catalog.trial_reference_plan() {
            Some(plan) => Entitlements::from_plan(plan, true),
            // Catalog misconfiguration (no reference plan flagged).
            None => Entitlements::fail_closed(),
        };
    }

    let plan_id = record.and_then(|r| r.selected_plan_id.or(r.current_plan_id));

    match plan_id.and_then(|id| catalog.find(id)) {
        Some(plan) => Entitlements::from_plan(plan, false),
        None => Entitlements::fail_closed(),
    }
}

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("{feature} limit reached: current={current_usage}")]
    LimitReached {
        feature: LimitedFeature,
        current_usage: u32,
    },
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EntitlementError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            EntitlementError::LimitReached { .. } => StatusCode::FORBIDDEN,
            EntitlementError::UnknownFeature(_) => StatusCode::BAD_REQUEST,
            EntitlementError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type EntitlementResult<T> = std::result::Result<T, EntitlementError>;

/// Answers "what may this professional do right now" by combining the stored
/// subscription record, the plan catalog, and usage counts.
pub struct EntitlementUseCase<P, S, U>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
    usage_repo: Arc<U>,
}

impl<P, S, U> EntitlementUseCase<P, S, U>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, subscription_repo: Arc<S>, usage_repo: Arc<U>) -> Self {
        Self {
            plan_repo,
            subscription_repo,
            usage_repo,
        }
    }

    pub async fn current_entitlements(
        &self,
        professional_id: Uuid,
        now: DateTime<Utc>,
    ) -> EntitlementResult<EntitlementSummaryDto> {
        let (record, catalog) = self.load_record_and_catalog(professional_id).await?;

        let state = resolve_lifecycle_state(record.as_ref(), now);
        let entitlements = resolve_entitlements(&state, record.as_ref(), &catalog);
        let usage = self.load_usage(professional_id, now).await?;
        let trial_days = record
            .as_ref()
            .map(|r| trial_days_remaining(r, now))
            .unwrap_or(0);

        debug!(
            %professional_id,
            lifecycle_state = %state,
            is_full_access = entitlements.is_full_access,
            "entitlements: resolved"
        );

        Ok(EntitlementSummaryDto {
            lifecycle_state: state,
            entitlements,
            usage,
            trial_days_remaining: trial_days,
        })
    }

    /// Pre-flight check for one more unit of a counted feature. Read-only;
    /// the actual insert stays with the caller.
    pub async fn check_feature(
        &self,
        professional_id: Uuid,
        feature: LimitedFeature,
        now: DateTime<Utc>,
    ) -> EntitlementResult<FeatureCheckDto> {
        let (record, catalog) = self.load_record_and_catalog(professional_id).await?;

        let state = resolve_lifecycle_state(record.as_ref(), now);
        let entitlements = resolve_entitlements(&state, record.as_ref(), &catalog);
        let limit = entitlements.limit_for(feature);

        let current_usage = self.count_usage(professional_id, feature, now).await?;
        let allowed = limit.allows_one_more(current_usage);

        debug!(
            %professional_id,
            feature = %feature,
            current_usage,
            allowed,
            "entitlements: feature check"
        );

        Ok(FeatureCheckDto {
            feature,
            allowed,
            current_usage,
            limit,
        })
    }

    /// Like `check_feature` but turns a denial into an error, for call sites
    /// that gate a mutation.
    pub async fn ensure_feature_allowed(
        &self,
        professional_id: Uuid,
        feature: LimitedFeature,
        now: DateTime<Utc>,
    ) -> EntitlementResult<()> {
        let check = self.check_feature(professional_id, feature, now).await?;

        if !check.allowed {
            let err = EntitlementError::LimitReached {
                feature,
                current_usage: check.current_usage,
            };
            warn!(
                %professional_id,
                feature = %feature,
                current_usage = check.current_usage,
                status = err.status_code().as_u16(),
                "entitlements: feature denied"
            );
            return Err(err);
        }

        Ok(())
    }

    async fn load_record_and_catalog(
        &self,
        professional_id: Uuid,
    ) -> EntitlementResult<(Option<SubscriptionEntity>, PlanCatalog)> {
        let record = self
            .subscription_repo
            .find_by_professional_id(professional_id)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    db_error = ?err,
                    "entitlements: failed to load subscription record"
                );
                EntitlementError::Internal(err)
            })?;

        let plans = self.plan_repo.list_active_plans().await.map_err(|err| {
            error!(
                %professional_id,
                db_error = ?err,
                "entitlements: failed to load plan catalog"
            );
            EntitlementError::Internal(err)
        })?;

        Ok((record, PlanCatalog::new(plans)))
    }

    async fn load_usage(
        &self,
        professional_id: Uuid,
        now: DateTime<Utc>,
    ) -> EntitlementResult<UsageSnapshot> {
        let since = month_start(now);

        let contact_requests = self
            .usage_repo
            .count_contact_requests_since(professional_id, since)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    db_error = ?err,
                    "entitlements: failed to count contact requests"
                );
                EntitlementError::Internal(err)
            })?;

        let work_photos = self
            .usage_repo
            .count_work_photos(professional_id)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    db_error = ?err,
                    "entitlements: failed to count work photos"
                );
                EntitlementError::Internal(err)
            })?;

        let bookings = self
            .usage_repo
            .count_bookings_since(professional_id, since)
            .await
            .map_err(|err| {
                error!(
                    %professional_id,
                    db_error = ?err,
                    "entitlements: failed to count bookings"
                );
                EntitlementError::Internal(err)
            })?;

        Ok(UsageSnapshot {
            contact_requests_this_month: clamp_count(contact_requests),
            work_photos_total: clamp_count(work_photos),
            bookings_this_month: clamp_count(bookings),
        })
    }

    async fn count_usage(
        &self,
        professional_id: Uuid,
        feature: LimitedFeature,
        now: DateTime<Utc>,
    ) -> EntitlementResult<u32> {
        let count = match feature {
            LimitedFeature::ContactRequest => {
                self.usage_repo
                    .count_contact_requests_since(professional_id, month_start(now))
                    .await
            }
            LimitedFeature::WorkPhoto => self.usage_repo.count_work_photos(professional_id).await,
            LimitedFeature::Booking => {
                self.usage_repo
                    .count_bookings_since(professional_id, month_start(now))
                    .await
            }
        }
        .map_err(|err| {
            error!(
                %professional_id,
                feature = %feature,
                db_error = ?err,
                "entitlements: failed to count usage"
            );
            EntitlementError::Internal(err)
        })?;

        Ok(clamp_count(count))
    }
}

fn clamp_count(count: i64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::plans::PlanEntity,
        repositories::{
            plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
            usage::MockUsageRepository,
        },
        value_objects::{
            enums::subscription_statuses::SubscriptionStatus,
            plans::{FeatureLimit, PlanFeatures},
        },
    };
    use chrono::{Duration, TimeZone};
    use mockall::predicate::eq;

    fn plan(id: Uuid, is_trial_reference: bool, features: PlanFeatures) -> PlanEntity {
        PlanEntity {
            id,
            name: Some("Plan".to_string()),
            price_minor: 4_990,
            currency: "ARS".to_string(),
            billing_interval_days: 30,
            grace_period_days: 7,
            features,
            is_trial_reference,
            is_active: true,
        }
    }

    fn full_features() -> PlanFeatures {
        PlanFeatures {
            max_contact_requests_per_month: Some(FeatureLimit::Unlimited),
            max_work_photos: Some(FeatureLimit::Unlimited),
            max_monthly_bookings: Some(FeatureLimit::Unlimited),
            can_receive_messages: Some(true),
            can_send_files: Some(true),
            priority_support: Some(true),
            advanced_analytics: Some(true),
            featured_listing: Some(true),
            calendar_integration: Some(true),
        }
    }

    fn basic_features() -> PlanFeatures {
        PlanFeatures {
            max_contact_requests_per_month: Some(FeatureLimit::Limit(5)),
            max_work_photos: Some(FeatureLimit::Limit(3)),
            max_monthly_bookings: Some(FeatureLimit::Limit(10)),
            can_receive_messages: Some(true),
            can_send_files: Some(false),
            priority_support: Some(false),
            advanced_analytics: Some(false),
            featured_listing: Some(false),
            calendar_integration: Some(false),
        }
    }

    fn record(status: SubscriptionStatus) -> SubscriptionEntity {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            professional_id: Uuid::new_v4(),
            current_plan_id: None,
            selected_plan_id: None,
            status: status.to_string(),
            trial_start_date: start,
            trial_end_date: start + Duration::days(90),
            payment_data_required_date: start + Duration::days(75),
            next_billing_date: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn trial_ignores_selected_plan_and_grants_full_access() {
        let reference_id = Uuid::new_v4();
        let restrictive_id = Uuid::new_v4();
        let catalog = PlanCatalog::new(vec![
            plan(reference_id, true, full_features()),
            plan(restrictive_id, false, basic_features()),
        ]);

        let mut rec = record(SubscriptionStatus::Trial);
        rec.selected_plan_id = Some(restrictive_id);

        let entitlements =
            resolve_entitlements(&LifecycleState::Trial, Some(&rec), &catalog);

        assert!(entitlements.is_full_access);
        assert_eq!(
            entitlements.max_contact_requests_per_month,
            FeatureLimit::Unlimited
        );
        assert!(entitlements.can_send_files);
    }

    #[test]
    fn payment_reminder_still_gets_the_reference_plan() {
        let reference_id = Uuid::new_v4();
        let catalog = PlanCatalog::new(vec![plan(reference_id, true, full_features())]);
        let rec = record(SubscriptionStatus::Trial);

        let entitlements =
            resolve_entitlements(&LifecycleState::PaymentReminder, Some(&rec), &catalog);

        assert!(entitlements.is_full_access);
        assert_eq!(entitlements.max_work_photos, FeatureLimit::Unlimited);
    }

    #[test]
    fn selected_plan_wins_over_current_plan_outside_trial() {
        let current_id = Uuid::new_v4();
        let selected_id = Uuid::new_v4();
        let catalog = PlanCatalog::new(vec![
            plan(current_id, false, full_features()),
            plan(selected_id, false, basic_features()),
        ]);

        let mut rec = record(SubscriptionStatus::Active);
        rec.current_plan_id = Some(current_id);
        rec.selected_plan_id = Some(selected_id);

        let entitlements =
            resolve_entitlements(&LifecycleState::Active, Some(&rec), &catalog);

        assert!(!entitlements.is_full_access);
        assert_eq!(
            entitlements.max_contact_requests_per_month,
            FeatureLimit::Limit(5)
        );
    }

    #[test]
    fn unknown_plan_id_fails_closed_without_error() {
        let catalog = PlanCatalog::new(vec![plan(Uuid::new_v4(), true, full_features())]);

        let mut rec = record(SubscriptionStatus::Active);
        rec.current_plan_id = Some(Uuid::new_v4());

        let entitlements =
            resolve_entitlements(&LifecycleState::Active, Some(&rec), &catalog);

        assert_eq!(entitlements, Entitlements::fail_closed());
    }

    #[test]
    fn missing_record_in_none_state_fails_closed() {
        let catalog = PlanCatalog::new(vec![plan(Uuid::new_v4(), true, full_features())]);
        let entitlements = resolve_entitlements(&LifecycleState::None, None, &catalog);
        assert_eq!(entitlements, Entitlements::fail_closed());
    }

    #[test]
    fn missing_trial_reference_plan_fails_closed_even_in_trial() {
        // Catalog without any flagged reference plan.
        let catalog = PlanCatalog::new(vec![plan(Uuid::new_v4(), false, full_features())]);
        let rec = record(SubscriptionStatus::Trial);

        let entitlements =
            resolve_entitlements(&LifecycleState::Trial, Some(&rec), &catalog);

        assert_eq!(entitlements, Entitlements::fail_closed());
    }

    #[test]
    fn analytics_and_support_come_from_plan_fields_without_state_gating() {
        let plan_id = Uuid::new_v4();
        let mut features = basic_features();
        features.priority_support = Some(true);
        features.advanced_analytics = Some(true);
        let catalog = PlanCatalog::new(vec![plan(plan_id, false, features)]);

        let mut rec = record(SubscriptionStatus::Trial);
        rec.selected_plan_id = Some(plan_id);

        // payment_required is not `active`, yet the stored plan fields apply.
        let entitlements =
            resolve_entitlements(&LifecycleState::PaymentRequired, Some(&rec), &catalog);

        assert!(entitlements.priority_support);
        assert!(entitlements.advanced_analytics);
    }

    #[tokio::test]
    async fn check_feature_counts_monthly_usage_from_the_first_of_the_month() {
        let professional_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap();
        let expected_since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut usage_repo = MockUsageRepository::new();

        let mut rec = record(SubscriptionStatus::Active);
        rec.professional_id = professional_id;
        rec.current_plan_id = Some(plan_id);

        subscription_repo
            .expect_find_by_professional_id()
            .with(eq(professional_id))
            .returning(move |_| {
                let rec = rec.clone();
                Box::pin(async move { Ok(Some(rec)) })
            });

        let catalog_plan = plan(plan_id, false, basic_features());
        plan_repo.expect_list_active_plans().returning(move || {
            let catalog_plan = catalog_plan.clone();
            Box::pin(async move { Ok(vec![catalog_plan]) })
        });

        usage_repo
            .expect_count_contact_requests_since()
            .with(eq(professional_id), eq(expected_since))
            .returning(|_, _| Box::pin(async { Ok(4) }));

        let usecase = EntitlementUseCase::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            Arc::new(usage_repo),
        );

        let check = usecase
            .check_feature(professional_id, LimitedFeature::ContactRequest, now)
            .await
            .unwrap();

        assert!(check.allowed);
        assert_eq!(check.current_usage, 4);
        assert_eq!(check.limit, FeatureLimit::Limit(5));
    }

    #[tokio::test]
    async fn ensure_feature_allowed_denies_at_the_limit() {
        let professional_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap();

        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut usage_repo = MockUsageRepository::new();

        let mut rec = record(SubscriptionStatus::Active);
        rec.professional_id = professional_id;
        rec.current_plan_id = Some(plan_id);

        subscription_repo
            .expect_find_by_professional_id()
            .returning(move |_| {
                let rec = rec.clone();
                Box::pin(async move { Ok(Some(rec)) })
            });

        let catalog_plan = plan(plan_id, false, basic_features());
        plan_repo.expect_list_active_plans().returning(move || {
            let catalog_plan = catalog_plan.clone();
            Box::pin(async move { Ok(vec![catalog_plan]) })
        });

        usage_repo
            .expect_count_work_photos()
            .returning(|_| Box::pin(async { Ok(3) }));

        let usecase = EntitlementUseCase::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            Arc::new(usage_repo),
        );

        let err = usecase
            .ensure_feature_allowed(professional_id, LimitedFeature::WorkPhoto, now)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EntitlementError::LimitReached {
                feature: LimitedFeature::WorkPhoto,
                current_usage: 3,
            }
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_plan_denies_via_fail_closed_entitlements() {
        let professional_id = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();

        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut usage_repo = MockUsageRepository::new();

        let mut rec = record(SubscriptionStatus::Active);
        rec.professional_id = professional_id;
        rec.current_plan_id = Some(Uuid::new_v4());

        subscription_repo
            .expect_find_by_professional_id()
            .returning(move |_| {
                let rec = rec.clone();
                Box::pin(async move { Ok(Some(rec)) })
            });

        // Catalog has no matching plan at all.
        plan_repo
            .expect_list_active_plans()
            .returning(|| Box::pin(async { Ok(Vec::new()) }));

        usage_repo
            .expect_count_contact_requests_since()
            .returning(|_, _| Box::pin(async { Ok(0) }));

        let usecase = EntitlementUseCase::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            Arc::new(usage_repo),
        );

        let check = usecase
            .check_feature(professional_id, LimitedFeature::ContactRequest, now)
            .await
            .unwrap();

        // Denied, not erroring: the fail-closed set carries Limit(0).
        assert!(!check.allowed);
        assert_eq!(check.limit, FeatureLimit::Limit(0));
    }
}
