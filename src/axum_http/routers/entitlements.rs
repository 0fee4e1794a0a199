use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::domain::{
    repositories::{
        plans::PlanRepository, subscriptions::SubscriptionRepository, usage::UsageRepository,
    },
    value_objects::usage::LimitedFeature,
};
use crate::infra::db::{
    postgres::postgres_connection::PgPool,
    repositories::{
        plans::PlanPostgres, subscriptions::SubscriptionPostgres, usage::UsagePostgres,
    },
};
use crate::usecases::entitlements::{EntitlementError, EntitlementUseCase};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let plan_repo = PlanPostgres::new(Arc::clone(&db_pool));
    let subscription_repo = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let usage_repo = UsagePostgres::new(Arc::clone(&db_pool));
    let usecase = EntitlementUseCase::new(
        Arc::new(plan_repo),
        Arc::new(subscription_repo),
        Arc::new(usage_repo),
    );

    Router::new()
        .route("/current", get(current_entitlements))
        .route("/checks/:feature", get(check_feature))
        .with_state(Arc::new(usecase))
}

async fn current_entitlements<P, S, U>(
    State(usecase): State<Arc<EntitlementUseCase<P, S, U>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, EntitlementError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
{
    let summary = usecase
        .current_entitlements(auth.professional_id, Utc::now())
        .await?;

    Ok(Json(summary))
}

async fn check_feature<P, S, U>(
    State(usecase): State<Arc<EntitlementUseCase<P, S, U>>>,
    auth: AuthUser,
    Path(feature): Path<String>,
) -> Result<impl IntoResponse, EntitlementError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
{
    let feature = LimitedFeature::from_str(&feature)
        .ok_or_else(|| EntitlementError::UnknownFeature(feature))?;

    let check = usecase
        .check_feature(auth.professional_id, feature, Utc::now())
        .await?;

    Ok(Json(check))
}
