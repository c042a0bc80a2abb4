//! Entry point: loads configuration, prepares the database, then runs the
//! Telegram dispatcher, the daily jobs and the health server together.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use housekeeping_bot::bot::handlers::BotHandler;
use housekeeping_bot::config::Config;
use housekeeping_bot::database::connection::DatabaseManager;
use housekeeping_bot::services::health::HealthService;
use housekeeping_bot::services::scheduler::DailyJobs;
use housekeeping_bot::state::AppState;
use housekeeping_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "housekeeping_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting Housekeeping Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Timezone: {}",
        config.database_url, config.http_port, config.timezone
    );
    if config.admin_ids.is_empty() {
        tracing::warn!("ADMIN_IDS is empty: every user is treated as an admin");
    }

    let db = DatabaseManager::new(&config.database_url).await?;
    db.run_migrations().await?;
    log_system_event("database ready", Some(&config.database_url));

    let state = AppState::new(db, config.clone());
    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(state.clone());

    let mut jobs = DailyJobs::new(bot.clone(), state.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create job scheduler: {}", e))?;
    if let Err(e) = jobs.start().await {
        tracing::error!("Failed to start daily jobs: {}", e);
    } else {
        log_system_event("daily jobs started", None);
    }

    let health_service = HealthService::new(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    info!("Health check server listening on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = jobs.stop().await {
        tracing::warn!("Error stopping daily jobs: {}", e);
    }

    log_system_event("stopped", None);
    Ok(())
}
