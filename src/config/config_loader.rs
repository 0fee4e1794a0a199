use anyhow::{Context, Result};

use super::config_model::{Database, DotEnvyConfig, Server, Supabase, TrialSweep};
use super::stage::Stage;

const DEFAULT_TRIAL_SWEEP_INTERVAL_SECS: u64 = 3600;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is missing")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .context("SERVER_BODY_LIMIT is missing")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .context("SERVER_TIMEOUT is missing")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is missing")?,
    };

    let supabase = Supabase {
        project_url: std::env::var("SUPABASE_PROJECT_URL")
            .context("SUPABASE_PROJECT_URL is missing")?,
        jwt_secret: std::env::var("SUPABASE_JWT_SECRET")
            .context("SUPABASE_JWT_SECRET is missing")?,
    };

    let trial_sweep = TrialSweep {
        interval_secs: match std::env::var("TRIAL_SWEEP_INTERVAL_SECS") {
            Ok(value) => value.parse().context("TRIAL_SWEEP_INTERVAL_SECS is invalid")?,
            Err(_) => DEFAULT_TRIAL_SWEEP_INTERVAL_SECS,
        },
    };

    Ok(DotEnvyConfig {
        server,
        database,
        supabase,
        trial_sweep,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(stage_str.as_str()).unwrap_or_default()
}

pub fn get_supabase_jwt_secret() -> Result<String> {
    dotenvy::dotenv().ok();

    std::env::var("SUPABASE_JWT_SECRET").context("SUPABASE_JWT_SECRET is missing")
}
