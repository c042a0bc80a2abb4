use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::database::models::{Setting, TIMEZONE_KEY};
use crate::services::control::Actor;
use crate::services::pending::PendingActions;
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use std::sync::Arc;

/// Everything a handler needs, cloned into each dispatcher branch.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub config: Arc<Config>,
    pub pending: PendingActions,
}

impl AppState {
    pub fn new(db: DatabaseManager, config: Arc<Config>) -> Self {
        let pending = PendingActions::new(Duration::minutes(config.pending_ttl_minutes));
        Self { db, config, pending }
    }

    /// The `/set_tz` override if one was stored, otherwise the configured zone.
    pub async fn timezone(&self) -> Tz {
        match Setting::get(&self.db.pool, TIMEZONE_KEY).await {
            Ok(Some(name)) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid stored timezone '{}'", name);
                self.config.timezone
            }),
            Ok(None) => self.config.timezone,
            Err(e) => {
                tracing::error!("Failed to read timezone setting: {}", e);
                self.config.timezone
            }
        }
    }

    pub async fn today(&self) -> NaiveDate {
        crate::utils::datetime::today_in(self.timezone().await)
    }

    pub async fn actor(&self, user_id: i64, display_name: &str) -> Result<Actor, sqlx::Error> {
        Actor::resolve(&self.db.pool, &self.config, user_id, display_name).await
    }
}
