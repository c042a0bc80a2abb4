use crate::database::models::*;
use crate::services::report::report_text;
use crate::state::AppState;
use crate::utils::datetime::{daily_cron_utc, format_work_date};
use crate::utils::validation::validate_telegram_chat_id;
use chrono::{Duration, NaiveDate};
use teloxide::{prelude::*, Bot};
use tokio_cron_scheduler::{Job, JobScheduler};

pub const SYSTEM_ACTOR: &str = "system";

/// Daily report and nightly carryover jobs.
pub struct DailyJobs {
    bot: Bot,
    state: AppState,
    scheduler: JobScheduler,
}

impl DailyJobs {
    pub async fn new(bot: Bot, state: AppState) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            bot,
            state,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let config = self.state.config.clone();

        let Some(chat_id) = config.report_chat_id else {
            tracing::info!("REPORT_CHAT_ID not set, daily report and carryover jobs disabled");
            return Ok(());
        };
        validate_telegram_chat_id(chat_id)?;

        let timezone = self.state.timezone().await;
        let today = self.state.today().await;

        let report_cron = daily_cron_utc(config.report_time, timezone, today);
        let bot = self.bot.clone();
        let state = self.state.clone();
        let report_job = Job::new_async(report_cron.as_str(), move |_uuid, _l| {
            let bot = bot.clone();
            let state = state.clone();
            Box::pin(async move {
                if let Err(e) = send_daily_report(&bot, &state, ChatId(chat_id)).await {
                    tracing::error!("Failed to send daily report: {}", e);
                }
            })
        })?;
        self.scheduler.add(report_job).await?;
        tracing::info!(
            "Daily report scheduled at {} {} (cron '{}' UTC)",
            config.report_time.format("%H:%M"),
            timezone,
            report_cron
        );

        if config.auto_carryover {
            let carryover_cron = daily_cron_utc(config.carryover_time, timezone, today);
            let bot = self.bot.clone();
            let state = self.state.clone();
            let carryover_job = Job::new_async(carryover_cron.as_str(), move |_uuid, _l| {
                let bot = bot.clone();
                let state = state.clone();
                Box::pin(async move {
                    if let Err(e) = run_nightly_carryover(&bot, &state, ChatId(chat_id)).await {
                        tracing::error!("Nightly carryover failed: {}", e);
                    }
                })
            })?;
            self.scheduler.add(carryover_job).await?;
            tracing::info!(
                "Nightly carryover scheduled at {} {} (cron '{}' UTC)",
                config.carryover_time.format("%H:%M"),
                timezone,
                carryover_cron
            );
        }

        self.scheduler.start().await?;
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}

/// Sends today's report to `chat_id` and tries to pin it.
pub async fn send_daily_report(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let today = state.today().await;
    let stats = DailyStats::for_date(&state.db.pool, today).await?;

    let message = bot.send_message(chat_id, report_text(today, &stats)).await?;
    if let Err(e) = bot
        .pin_chat_message(chat_id, message.id)
        .disable_notification(true)
        .await
    {
        tracing::debug!("Could not pin daily report in chat {}: {}", chat_id.0, e);
    }

    tracing::info!("Daily report for {} sent to chat {}", today, chat_id.0);
    Ok(())
}

/// Moves today's unfinished rooms into tomorrow's plan.
pub async fn carry_over_unfinished(
    pool: &sqlx::SqlitePool,
    today: NaiveDate,
) -> Result<(NaiveDate, u64), sqlx::Error> {
    let tomorrow = today + Duration::days(1);
    let copied = RoomAssignment::carry_over(pool, today, tomorrow, SYSTEM_ACTOR).await?;
    Ok((tomorrow, copied))
}

async fn run_nightly_carryover(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let today = state.today().await;
    let (tomorrow, copied) = carry_over_unfinished(&state.db.pool, today).await?;

    tracing::info!("Carried {} unfinished rooms from {} to {}", copied, today, tomorrow);
    if copied > 0 {
        bot.send_message(
            chat_id,
            format!(
                "↪️ Неубранные номера ({}) перенесены на {}.",
                copied,
                format_work_date(tomorrow)
            ),
        )
        .await?;
    }

    Ok(())
}
