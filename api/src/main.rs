use std::sync::Arc;

use actix_web::HttpServer;
use anyhow::Context;
use log::info;

use st_api::app::{create_app, AppServices};
use st_core::repositories::{RefreshTokenRepository, UserRepository};
use st_core::services::{Clock, OsRandom, RandomSource, RefreshTokenSweeper, SystemClock};
use st_infra::{
    DatabasePool, InMemoryRefreshTokenRepository, InMemoryUserRepository,
    MySqlRefreshTokenRepository, MySqlUserRepository,
};
use st_shared::{AppConfig, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    info!(
        "Starting Strive API ({} environment, {} storage)",
        config.environment, config.database.backend
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let random: Arc<dyn RandomSource> = Arc::new(OsRandom);

    match config.database.backend {
        StorageBackend::Mysql => {
            let pool = DatabasePool::new(&config.database)
                .await
                .context("failed to connect to MySQL")?;
            info!("{}", pool.get_statistics());

            let users = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
            let tokens = Arc::new(MySqlRefreshTokenRepository::new(
                pool.get_pool().clone(),
                clock.clone(),
            ));
            serve(&config, users, tokens, clock, random).await?;
            pool.close().await;
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; accounts and sessions are lost on restart");
            let users = Arc::new(InMemoryUserRepository::new());
            let tokens = Arc::new(InMemoryRefreshTokenRepository::new(clock.clone()));
            serve(&config, users, tokens, clock, random).await?;
        }
    }

    info!("Strive API stopped");
    Ok(())
}

async fn serve<U, T>(
    config: &AppConfig,
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
) -> anyhow::Result<()>
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    let services = AppServices::build(config, users, tokens.clone(), clock, random);

    if let Some(limiter) = &services.limiter {
        limiter.start_sweeper(config.rate_limit.sweep_interval);
    }

    Arc::new(RefreshTokenSweeper::new(
        tokens,
        config.auth.refresh_token_sweep_interval,
        config.auth.store_timeout,
    ))
    .start_background_task();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(&services))
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server error")?;

    Ok(())
}
