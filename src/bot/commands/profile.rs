use teloxide::prelude::*;

use super::{help_text, Sender};
use crate::bot::HandlerResult;
use crate::database::models::User;
use crate::state::AppState;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_start, log_command_success, log_validation_error};
use crate::utils::validation::validate_staff_name;

/// Registers the sender on first contact, drops any half-finished prompt
/// and shows the command list.
pub async fn handle_start(bot: Bot, msg: Message, state: &AppState) -> HandlerResult {
    let Some(sender) = Sender::of(&msg) else {
        bot.send_message(msg.chat.id, help_text()).await?;
        return Ok(());
    };
    log_command_start("start", &sender.display_name, sender.user_id, msg.chat.id.0, None);

    // The Telegram name is only a first guess; /iam overrides it.
    let known = User::find(&state.db.pool, sender.user_id).await?;
    let initial_name = match known.as_ref().and_then(|u| u.name.as_deref()) {
        Some(_) => None,
        None => validate_staff_name(&sender.full_name).ok(),
    };
    User::upsert(&state.db.pool, sender.user_id, initial_name.as_deref(), None).await?;
    state.pending.clear(sender.user_id).await;

    bot.send_message(msg.chat.id, help_text()).await?;

    log_command_success("start", &sender.display_name, sender.user_id, msg.chat.id.0, None);
    Ok(())
}

/// Saves the name used to match the sender against the plan's staff column.
pub async fn handle_iam(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("iam", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    let name = match validate_staff_name(&arg) {
        Ok(name) => name,
        Err(e) => {
            log_validation_error(
                "iam",
                "name",
                &arg,
                &e.to_string(),
                &sender.display_name,
                sender.user_id,
                msg.chat.id.0,
            );
            feedback
                .validation_error("Укажите имя так, как оно записано в плане.", "Пример: /iam Севара")
                .await?;
            return Ok(());
        }
    };

    let user = User::upsert(&state.db.pool, sender.user_id, Some(&name), None).await?;
    feedback
        .success(&format!(
            "Готово! Сохранил имя: {}. Номера с этим именем в плане теперь ваши (/my).",
            user.name.as_deref().unwrap_or(&name)
        ))
        .await?;

    log_command_success("iam", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&name));
    Ok(())
}

pub async fn handle_chatid(bot: Bot, msg: Message) -> HandlerResult {
    let title = msg
        .chat
        .title()
        .map(str::to_string)
        .or_else(|| msg.chat.username().map(|u| format!("@{u}")))
        .unwrap_or_else(|| "личный чат".to_string());

    bot.send_message(
        msg.chat.id,
        format!("Chat ID: {}\nНазвание: {}", msg.chat.id.0, title),
    )
    .await?;
    Ok(())
}
