use anyhow::Result;
use chequealo_backend::axum_http::http_serve;
use chequealo_backend::config::config_loader;
use chequealo_backend::infra::db::{
    postgres::postgres_connection, repositories::subscriptions::SubscriptionPostgres,
};
use chequealo_backend::observability;
use chequealo_backend::usecases::trial_expiry::TrialExpiryUseCase;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backend exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability()?;

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let postgres_pool = Arc::new(postgres_pool);

    let trial_expiry = Arc::new(TrialExpiryUseCase::new(Arc::new(SubscriptionPostgres::new(
        Arc::clone(&postgres_pool),
    ))));
    let sweep_interval = dotenvy_env.trial_sweep.interval_secs;
    tokio::spawn(trial_expiry.run_loop(sweep_interval));
    info!(
        interval_secs = sweep_interval,
        "Trial expiry sweep scheduled"
    );

    http_serve::start(Arc::new(dotenvy_env), postgres_pool).await?;

    Ok(())
}
