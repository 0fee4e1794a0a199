use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use crate::auth::AuthUser;
use crate::domain::{
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::subscriptions::{BillingConfirmationRequest, SelectPlanRequest},
};
use crate::infra::db::{
    postgres::postgres_connection::PgPool,
    repositories::{plans::PlanPostgres, subscriptions::SubscriptionPostgres},
};
use crate::usecases::subscriptions::{SubscriptionError, SubscriptionUseCase};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let plan_repo = PlanPostgres::new(Arc::clone(&db_pool));
    let subscription_repo = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let usecase = SubscriptionUseCase::new(Arc::new(plan_repo), Arc::new(subscription_repo));

    Router::new()
        .route("/plans", get(list_plans))
        .route("/current", get(get_current_subscription))
        .route("/start-trial", post(start_trial))
        .route("/select-plan", post(select_plan))
        .route("/billing-confirmation", post(billing_confirmation))
        .with_state(Arc::new(usecase))
}

async fn list_plans<P, S>(
    State(usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, SubscriptionError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let plans = usecase.list_plans().await?;
    Ok(Json(plans))
}

async fn get_current_subscription<P, S>(
    State(usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, SubscriptionError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let current = usecase
        .get_current_subscription(auth.professional_id, Utc::now())
        .await?;

    match current {
        Some(dto) => Ok(Json(dto).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn start_trial<P, S>(
    State(usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, SubscriptionError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let dto = usecase
        .start_trial(auth.professional_id, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn select_plan<P, S>(
    State(usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    auth: AuthUser,
    Json(request): Json<SelectPlanRequest>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    usecase
        .select_plan(auth.professional_id, request.plan_id, Utc::now())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Billing confirmations come from the payments side with a service-role
/// token, never from a professional session.
async fn billing_confirmation<P, S>(
    State(usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    auth: AuthUser,
    Json(request): Json<BillingConfirmationRequest>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    if !auth.is_service_role() {
        warn!(
            professional_id = %auth.professional_id,
            role = %auth.role,
            "subscriptions: billing confirmation rejected for non-service role"
        );
        return Ok(StatusCode::FORBIDDEN.into_response());
    }

    usecase
        .confirm_billing(
            request.professional_id,
            request.plan_id,
            request.next_billing_date,
            Utc::now(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
