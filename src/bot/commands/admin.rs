//! Commands that change the plan or bot settings. Only admins may run them.

use chrono::{Duration, Utc};
use teloxide::prelude::*;

use super::{date_argument, Sender};
use crate::bot::HandlerResult;
use crate::database::models::{RoomAssignment, Setting, TIMEZONE_KEY};
use crate::services::control::Actor;
use crate::services::pending::PendingAction;
use crate::state::AppState;
use crate::utils::datetime::format_work_date;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_start, log_command_success, log_validation_error};
use crate::utils::validation::validate_timezone;

const ADMIN_ONLY: &str = "Только админ может выполнять эту команду.";

/// Resolves the sender and refuses non-admins in-band.
async fn require_admin(
    feedback: &CommandFeedback,
    state: &AppState,
    sender: &Sender,
    command: &str,
) -> Result<Option<Actor>, crate::bot::HandlerError> {
    let actor = state.actor(sender.user_id, &sender.display_name).await?;
    if actor.is_admin {
        return Ok(Some(actor));
    }

    tracing::warn!(
        "Non-admin {}({}) tried /{}",
        sender.display_name,
        sender.user_id,
        command
    );
    feedback.forbidden(ADMIN_ONLY).await?;
    Ok(None)
}

/// Arms a pending upload so the next CSV from this admin lands on the date.
pub async fn handle_upload_plan(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("upload_plan", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    if require_admin(&feedback, state, &sender, "upload_plan").await?.is_none() {
        return Ok(());
    }

    let today = state.today().await;
    let Some(work_date) = date_argument(&feedback, &arg, today, "/upload_plan 2024-05-17").await? else {
        return Ok(());
    };

    state
        .pending
        .set(sender.user_id, PendingAction::AwaitPlan { work_date }, Utc::now())
        .await;

    feedback
        .info(&format!(
            "Пришлите CSV: room_no,staff_name,cleaning_type (Полная/Текущая).\n\
            Дата плана: {}. Жду файл {} мин.",
            format_work_date(work_date),
            state.config.pending_ttl_minutes
        ))
        .await?;

    log_command_success(
        "upload_plan",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(&format!("awaiting plan for {work_date}")),
    );
    Ok(())
}

pub async fn handle_resetday(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("resetday", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    if require_admin(&feedback, state, &sender, "resetday").await?.is_none() {
        return Ok(());
    }

    let today = state.today().await;
    let Some(work_date) = date_argument(&feedback, &arg, today, "/resetday 2024-05-17").await? else {
        return Ok(());
    };

    let deleted = RoomAssignment::delete_day(&state.db.pool, work_date).await?;
    feedback
        .success(&format!(
            "План на {} очищен (удалено номеров: {}).",
            format_work_date(work_date),
            deleted
        ))
        .await?;

    log_command_success(
        "resetday",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(&format!("{deleted} rooms removed from {work_date}")),
    );
    Ok(())
}

/// Copies today's unfinished rooms into a later day, tomorrow by default.
pub async fn handle_carryover(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("carryover", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    let Some(actor) = require_admin(&feedback, state, &sender, "carryover").await? else {
        return Ok(());
    };

    let today = state.today().await;
    let tomorrow = today + Duration::days(1);
    let Some(target) = date_argument(&feedback, &arg, tomorrow, "/carryover 2024-05-18").await? else {
        return Ok(());
    };

    if target <= today {
        log_validation_error(
            "carryover",
            "date",
            &arg,
            "target is not after today",
            &sender.display_name,
            sender.user_id,
            msg.chat.id.0,
        );
        feedback
            .validation_error(
                &format!("Дата переноса должна быть позже {}.", format_work_date(today)),
                "Пример: /carryover без даты переносит на завтра",
            )
            .await?;
        return Ok(());
    }

    let copied = RoomAssignment::carry_over(&state.db.pool, today, target, &actor.display_name).await?;
    feedback
        .success(&format!(
            "Перенесено неубранных номеров: {} ({} → {}).",
            copied,
            format_work_date(today),
            format_work_date(target)
        ))
        .await?;

    log_command_success(
        "carryover",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(&format!("{copied} rooms {today} -> {target}")),
    );
    Ok(())
}

/// Stores a timezone override used from now on to decide what "today" is.
pub async fn handle_set_tz(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("set_tz", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    if require_admin(&feedback, state, &sender, "set_tz").await?.is_none() {
        return Ok(());
    }

    let tz = match validate_timezone(&arg) {
        Ok(tz) => tz,
        Err(e) => {
            log_validation_error(
                "set_tz",
                "timezone",
                &arg,
                &e.to_string(),
                &sender.display_name,
                sender.user_id,
                msg.chat.id.0,
            );
            feedback
                .validation_error("Некорректный часовой пояс.", "Пример: /set_tz Asia/Tashkent")
                .await?;
            return Ok(());
        }
    };

    Setting::set(&state.db.pool, TIMEZONE_KEY, tz.name()).await?;
    feedback
        .success(&format!(
            "Часовой пояс установлен: {}. Время отчёта и переноса изменится после перезапуска.",
            tz.name()
        ))
        .await?;

    log_command_success(
        "set_tz",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(tz.name()),
    );
    Ok(())
}

