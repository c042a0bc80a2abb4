use chrono::Utc;
use std::time::Duration;
use teloxide::net::Download;
use teloxide::prelude::*;

use crate::bot::commands::Sender;
use crate::bot::{HandlerError, HandlerResult};
use crate::database::models::RoomAssignment;
use crate::error::HousekeepingError;
use crate::services::import::import_plan;
use crate::services::report::{plan_text, split_message};
use crate::state::AppState;
use crate::utils::feedback::{CommandFeedback, ProgressTracker};
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_timeout, log_validation_error,
};
use crate::utils::validation::validate_plan_upload;

pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

const PLAN_FORMAT_HINT: &str =
    "Формат: room_no,staff_name,cleaning_type (Полная/Текущая), по строке на номер.";

/// Imports a CSV plan sent by an admin, for the date armed with
/// `/upload_plan` or for today.
pub async fn handle_document(bot: Bot, msg: Message, state: AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let (Some(document), Some(sender)) = (msg.document(), Sender::of(&msg)) else {
        return Ok(());
    };
    let file_name = document.file_name.clone();
    log_command_start(
        "plan_upload",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        file_name.as_deref(),
    );

    let actor = state.actor(sender.user_id, &sender.display_name).await?;
    if !actor.is_admin {
        feedback.forbidden("Только админ может загружать план.").await?;
        return Ok(());
    }

    if let Err(e) = validate_plan_upload(file_name.as_deref(), document.file.size) {
        log_validation_error(
            "plan_upload",
            "document",
            file_name.as_deref().unwrap_or("-"),
            &e.to_string(),
            &sender.display_name,
            sender.user_id,
            msg.chat.id.0,
        );
        feedback.validation_error("Нужен CSV-файл до 1 МБ.", PLAN_FORMAT_HINT).await?;
        return Ok(());
    }

    let now = Utc::now();
    let work_date = match state.pending.take_plan_date(sender.user_id, now).await {
        Some(date) => date,
        None => state.today().await,
    };

    let mut progress = ProgressTracker::new(CommandFeedback::new(bot.clone(), msg.chat.id), 2);
    progress.start("Загружаю файл…").await?;

    let file_id = document.file.id.clone();
    let download = async {
        let file = bot.get_file(file_id).await?;
        let mut bytes = Vec::new();
        bot.download_file(&file.path, &mut bytes).await?;
        Ok::<_, HandlerError>(bytes)
    };

    let bytes = match tokio::time::timeout(DOWNLOAD_TIMEOUT, download).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            log_command_error("plan_upload", &sender.display_name, sender.user_id, msg.chat.id.0, &e.to_string());
            progress.error("Не удалось скачать файл. Попробуйте ещё раз.").await?;
            return Ok(());
        }
        Err(_) => {
            log_timeout("plan_upload download", DOWNLOAD_TIMEOUT.as_secs(), file_name.as_deref());
            progress.error("Файл не скачался за 30 секунд. Попробуйте ещё раз.").await?;
            return Ok(());
        }
    };

    progress.next_step("Разбираю план…").await?;

    match import_plan(&state.db.pool, work_date, &bytes, &actor.display_name).await {
        Ok(summary) => {
            if summary.encoding.is_degraded() {
                progress.warn(&summary.describe()).await?;
            } else {
                progress.complete(&summary.describe()).await?;
            }

            let rooms = RoomAssignment::find_by_date(&state.db.pool, work_date).await?;
            for chunk in split_message(&plan_text(work_date, &rooms)) {
                bot.send_message(msg.chat.id, chunk).await?;
            }

            log_command_success(
                "plan_upload",
                &sender.display_name,
                sender.user_id,
                msg.chat.id.0,
                Some(&format!("{} rooms for {}", summary.inserted, work_date)),
            );
        }
        Err(HousekeepingError::EmptyPlan { skipped_lines }) => {
            log_command_error(
                "plan_upload",
                &sender.display_name,
                sender.user_id,
                msg.chat.id.0,
                &format!("no valid rows, {skipped_lines} lines skipped"),
            );
            progress
                .error(&format!(
                    "Файл пуст или неверного формата (пропущено строк: {skipped_lines}). \
                    План не изменён.\n{PLAN_FORMAT_HINT}"
                ))
                .await?;
        }
        Err(e) => {
            log_command_error("plan_upload", &sender.display_name, sender.user_id, msg.chat.id.0, &e.to_string());
            progress.error("Не удалось сохранить план. Прежний план не изменён.").await?;
        }
    }

    Ok(())
}
