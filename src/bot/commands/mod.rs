pub mod admin;
pub mod plan;
pub mod profile;
pub mod report;

use crate::bot::HandlerError;
use crate::utils::datetime::work_date_or;
use crate::utils::feedback::CommandFeedback;
use chrono::NaiveDate;
use teloxide::types::Message;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Команды бота учёта уборки:")]
pub enum Command {
    #[command(description = "показать это сообщение")]
    Help,
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "план на сегодня или на дату YYYY-MM-DD")]
    Plan(String),
    #[command(description = "мои номера с кнопками")]
    My(String),
    #[command(description = "отчёт за день")]
    Report(String),
    #[command(description = "выгрузка в CSV")]
    ExportCsv(String),
    #[command(description = "выгрузка в XLSX")]
    ExportXlsx(String),
    #[command(description = "загрузить CSV плана (админ)")]
    UploadPlan(String),
    #[command(rename = "resetday", description = "очистить план на день (админ)")]
    ResetDay(String),
    #[command(description = "перенести неубранные номера на дату, по умолчанию завтра (админ)")]
    Carryover(String),
    #[command(description = "установить часовой пояс, напр. Asia/Tashkent (админ)")]
    SetTz(String),
    #[command(description = "задать своё имя, как в плане")]
    Iam(String),
    #[command(rename = "chatid", description = "показать ID этого чата")]
    ChatId,
}

/// Who sent a command, as the handlers log and store it.
#[derive(Debug, Clone)]
pub struct Sender {
    pub user_id: i64,
    pub display_name: String,
    pub full_name: String,
}

impl Sender {
    pub fn of(msg: &Message) -> Option<Self> {
        msg.from().map(|user| {
            let full_name = user.full_name();
            Sender {
                user_id: user.id.0 as i64,
                display_name: user
                    .username
                    .as_ref()
                    .map(|u| format!("@{u}"))
                    .unwrap_or_else(|| full_name.clone()),
                full_name,
            }
        })
    }
}

pub fn help_text() -> String {
    format!(
        "Привет! Я бот учёта уборки номеров 🧹\n\n{}\n\n\
        Формат CSV плана: room_no,staff_name,cleaning_type (Полная/Текущая), \
        разделитель , или ;",
        Command::descriptions()
    )
}

/// Parses an optional date argument, telling the user when it is malformed.
pub(crate) async fn date_argument(
    feedback: &CommandFeedback,
    arg: &str,
    default: NaiveDate,
    usage: &str,
) -> Result<Option<NaiveDate>, HandlerError> {
    match work_date_or(arg, default) {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            feedback
                .validation_error(&e.to_string(), &format!("Пример: {usage}"))
                .await?;
            Ok(None)
        }
    }
}
