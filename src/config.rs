use anyhow::{anyhow, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use std::collections::HashSet;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/housekeeping.db";
pub const DEFAULT_TIMEZONE: &str = "Asia/Tashkent";

/// Process-wide settings, read once at startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub timezone: Tz,
    pub admin_ids: HashSet<i64>,
    pub report_chat_id: Option<i64>,
    pub report_time: NaiveTime,
    pub auto_carryover: bool,
    pub carryover_time: NaiveTime,
    pub pending_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .or_else(|_| env::var("BOT_TOKEN"))
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let database_url = if database_url.trim().is_empty() {
            DEFAULT_DATABASE_URL.to_string()
        } else {
            database_url
        };

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let tz_name = non_empty_var("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = tz_name
            .trim()
            .parse::<Tz>()
            .map_err(|_| anyhow!("Invalid TIMEZONE: {}", tz_name))?;

        let admin_ids = parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default());

        let report_chat_id = match non_empty_var("REPORT_CHAT_ID") {
            Some(raw) => {
                let id: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Invalid REPORT_CHAT_ID"))?;
                (id != 0).then_some(id)
            }
            None => None,
        };

        let report_time = parse_clock_time(
            &non_empty_var("REPORT_TIME").unwrap_or_else(|| "18:00".to_string()),
        )
        .map_err(|_| anyhow!("Invalid REPORT_TIME, expected HH:MM"))?;

        let carryover_time = parse_clock_time(
            &non_empty_var("CARRYOVER_TIME").unwrap_or_else(|| "23:55".to_string()),
        )
        .map_err(|_| anyhow!("Invalid CARRYOVER_TIME, expected HH:MM"))?;

        let auto_carryover = non_empty_var("AUTOCARRYOVER")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let pending_ttl_minutes = match non_empty_var("PENDING_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| anyhow!("Invalid PENDING_TTL_MINUTES"))?,
            None => 15,
        };

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            timezone,
            admin_ids,
            report_chat_id,
            report_time,
            auto_carryover,
            carryover_time,
            pending_ttl_minutes,
        })
    }

    /// With no configured admins every user is treated as one.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.is_empty() || self.admin_ids.contains(&user_id)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Comma separated Telegram ids; anything that is not a number is ignored.
pub fn parse_admin_ids(raw: &str) -> HashSet<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|part| part.parse().ok())
        .collect()
}

pub fn parse_clock_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| anyhow!("Invalid time '{}': {}", raw, e))
}
