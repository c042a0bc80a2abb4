use teloxide::prelude::*;
use teloxide::types::InputFile;

use super::{date_argument, Sender};
use crate::bot::HandlerResult;
use crate::database::models::{DailyStats, RoomAssignment};
use crate::services::report::{export_csv, export_file_name, export_xlsx, report_text};
use crate::state::AppState;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};

/// Which spreadsheet format `/export_*` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    fn command(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "export_csv",
            ExportFormat::Xlsx => "export_xlsx",
        }
    }
}

/// Sends the day's report and pins it when the bot has the right to.
pub async fn handle_report(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("report", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    let today = state.today().await;
    let Some(work_date) = date_argument(&feedback, &arg, today, "/report 2024-05-17").await? else {
        return Ok(());
    };

    let stats = DailyStats::for_date(&state.db.pool, work_date).await?;
    let report = bot.send_message(msg.chat.id, report_text(work_date, &stats)).await?;

    if let Err(e) = bot
        .pin_chat_message(msg.chat.id, report.id)
        .disable_notification(true)
        .await
    {
        tracing::debug!("Could not pin report in chat {}: {}", msg.chat.id.0, e);
    }

    log_command_success(
        "report",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(&format!("{}: {}/{} done", work_date, stats.done, stats.total)),
    );
    Ok(())
}

pub async fn handle_export(
    bot: Bot,
    msg: Message,
    arg: String,
    format: ExportFormat,
    state: &AppState,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    let command = format.command();
    log_command_start(command, &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    let today = state.today().await;
    let usage = format!("/{command} 2024-05-17");
    let Some(work_date) = date_argument(&feedback, &arg, today, &usage).await? else {
        return Ok(());
    };

    let rooms = RoomAssignment::find_by_date(&state.db.pool, work_date).await?;
    let bytes = match format {
        ExportFormat::Csv => export_csv(work_date, &rooms),
        ExportFormat::Xlsx => export_xlsx(work_date, &rooms),
    };

    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            log_command_error(command, &sender.display_name, sender.user_id, msg.chat.id.0, &e.to_string());
            feedback.error("Не удалось сформировать файл выгрузки.").await?;
            return Ok(());
        }
    };

    let file_name = export_file_name(work_date, format.extension());
    bot.send_document(msg.chat.id, InputFile::memory(bytes).file_name(file_name.clone()))
        .await?;

    log_command_success(
        command,
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(&format!("{} with {} rooms", file_name, rooms.len())),
    );
    Ok(())
}
