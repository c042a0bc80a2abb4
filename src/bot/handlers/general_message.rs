use chrono::Utc;
use teloxide::prelude::*;

use crate::bot::commands::Sender;
use crate::bot::HandlerResult;
use crate::error::HousekeepingError;
use crate::services::control::{apply_action, RoomAction};
use crate::services::pending::PendingAction;
use crate::services::report::room_card_text;
use crate::state::AppState;
use crate::utils::feedback::CommandFeedback;
use crate::utils::validation::MAX_COMMENT_CHARS;

/// Group chats also carry commands for other bots, so unknown commands are
/// only answered in private chats.
pub fn flags_unknown_command(text: &str, is_private_chat: bool) -> bool {
    is_private_chat && text.starts_with('/')
}

/// Plain messages: a pending comment is saved, anything else is mostly ignored.
pub async fn handle_general_message(bot: Bot, msg: Message, state: AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if text.starts_with('/') {
        if !flags_unknown_command(text, msg.chat.is_private()) {
            return Ok(());
        }
        let error_msg = format!(
            "Неизвестная команда: {}",
            text.split_whitespace().next().unwrap_or(text)
        );
        feedback
            .validation_error(&error_msg, "Список команд: /help")
            .await?;
        return Ok(());
    }

    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };

    let Some(room_id) = state.pending.take_comment(sender.user_id, Utc::now()).await else {
        return Ok(());
    };

    let actor = state.actor(sender.user_id, &sender.display_name).await?;
    match apply_action(
        &state.db.pool,
        &actor,
        room_id,
        RoomAction::SetComment(text.to_string()),
    )
    .await
    {
        Ok((room, _)) => {
            feedback
                .success(&format!("Комментарий сохранён 📝\n{}", room_card_text(&room)))
                .await?;
        }
        Err(HousekeepingError::InvalidInput(reason)) => {
            tracing::debug!("Comment from {} rejected: {}", sender.user_id, reason);
            // Keep waiting so the user can resend a shorter text.
            state
                .pending
                .set(sender.user_id, PendingAction::AwaitComment { room_id }, Utc::now())
                .await;
            feedback
                .validation_error(
                    "Комментарий пустой или слишком длинный.",
                    &format!("Отправьте текст до {MAX_COMMENT_CHARS} символов."),
                )
                .await?;
        }
        Err(HousekeepingError::Forbidden { .. }) => {
            feedback
                .forbidden("Только назначенная горничная или админ может менять этот номер.")
                .await?;
        }
        Err(HousekeepingError::RoomNotFound(_)) => {
            feedback
                .error("Номер не найден, возможно план был перезагружен.")
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to save comment for room record {}: {}", room_id, e);
            feedback.error("Не удалось сохранить комментарий.").await?;
        }
    }

    Ok(())
}
