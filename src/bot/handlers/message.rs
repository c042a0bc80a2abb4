use teloxide::prelude::*;

use crate::bot::commands::{admin, help_text, plan, profile, report, Command};
use crate::bot::commands::report::ExportFormat;
use crate::bot::HandlerResult;
use crate::state::AppState;

pub async fn command_handler(bot: Bot, msg: Message, cmd: Command, state: AppState) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, help_text()).await?;
        }
        Command::Start => profile::handle_start(bot, msg, &state).await?,
        Command::Plan(arg) => plan::handle_plan(bot, msg, arg, &state).await?,
        Command::My(arg) => plan::handle_my(bot, msg, arg, &state).await?,
        Command::Report(arg) => report::handle_report(bot, msg, arg, &state).await?,
        Command::ExportCsv(arg) => report::handle_export(bot, msg, arg, ExportFormat::Csv, &state).await?,
        Command::ExportXlsx(arg) => report::handle_export(bot, msg, arg, ExportFormat::Xlsx, &state).await?,
        Command::UploadPlan(arg) => admin::handle_upload_plan(bot, msg, arg, &state).await?,
        Command::ResetDay(arg) => admin::handle_resetday(bot, msg, arg, &state).await?,
        Command::Carryover(arg) => admin::handle_carryover(bot, msg, arg, &state).await?,
        Command::SetTz(arg) => admin::handle_set_tz(bot, msg, arg, &state).await?,
        Command::Iam(arg) => profile::handle_iam(bot, msg, arg, &state).await?,
        Command::ChatId => profile::handle_chatid(bot, msg).await?,
    }
    Ok(())
}
