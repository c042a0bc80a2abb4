use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::database::models::DailyStats;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub today: Option<PlanSnapshot>,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

/// Today's plan counts, as seen by the bot's timezone.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub work_date: NaiveDate,
    pub total: i64,
    pub done: i64,
    pub remaining: i64,
}

#[derive(Clone)]
struct HealthState {
    app: AppState,
    start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(app: AppState) -> Self {
        let state = HealthState {
            app,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<HealthState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_ok = test_database_connection(&state.app).await.is_ok();
    let response_time_ms = start.elapsed().as_millis() as u64;

    let today = if db_ok {
        let work_date = state.app.today().await;
        DailyStats::for_date(&state.app.db.pool, work_date)
            .await
            .ok()
            .map(|stats| PlanSnapshot {
                work_date,
                total: stats.total,
                done: stats.done,
                remaining: stats.remaining,
            })
    } else {
        None
    };

    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    if !db_ok {
        tracing::warn!("Health check failed: database unreachable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.app.db.pool.size(),
            response_time_ms,
        },
        today,
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<HealthState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.app).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(app: &AppState) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(&app.db.pool).await?;
    Ok(())
}
