use chrono::Utc;
use teloxide::prelude::*;

use crate::bot::keyboard::{room_keyboard, RoomCallback};
use crate::bot::HandlerResult;
use crate::database::models::RoomAssignment;
use crate::error::HousekeepingError;
use crate::services::control::{apply_action, authorize, ActionOutcome, Actor, RoomAction};
use crate::services::pending::PendingAction;
use crate::services::report::room_card_text;
use crate::state::AppState;

const FORBIDDEN_TEXT: &str = "⛔ Только назначенная горничная или админ может менять этот номер.";
const NOT_FOUND_TEXT: &str = "Номер не найден, возможно план был перезагружен.";
const FAILED_TEXT: &str = "Не удалось сохранить, попробуйте ещё раз.";

pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: AppState) -> HandlerResult {
    let user_id = q.from.id.0 as i64;
    let display_name = q
        .from
        .username
        .as_ref()
        .map(|u| format!("@{u}"))
        .unwrap_or_else(|| q.from.full_name());
    let chat_id = q.message.as_ref().map(|m| m.chat.id.0).unwrap_or(0);

    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    tracing::info!(
        "Callback received: '{}' from user {} ({}) in chat {}",
        data,
        display_name,
        user_id,
        chat_id
    );

    let callback = match RoomCallback::parse(&data) {
        Ok(callback) => callback,
        Err(e) => {
            tracing::warn!("Rejected callback from {}: {}", user_id, e);
            bot.answer_callback_query(q.id.clone())
                .text("Неизвестное действие.")
                .await?;
            return Ok(());
        }
    };

    let actor = state.actor(user_id, &display_name).await?;

    let action = match callback {
        RoomCallback::SetStatus { status, .. } => RoomAction::SetStatus(status),
        RoomCallback::ToggleType { .. } => RoomAction::ToggleType,
        RoomCallback::Comment { room_id } => {
            return request_comment(&bot, &q, &state, &actor, room_id).await;
        }
    };

    match apply_action(&state.db.pool, &actor, callback.room_id(), action).await {
        Ok((room, outcome)) => {
            let notice = match outcome {
                ActionOutcome::StatusChanged(status) => format!("Статус: {} ✅", status.label()),
                ActionOutcome::TypeChanged(cleaning_type) => {
                    format!("Тип уборки: {}", cleaning_type.label())
                }
                ActionOutcome::CommentSaved(_) => "Комментарий сохранён 📝".to_string(),
            };
            bot.answer_callback_query(q.id.clone()).text(notice).await?;
            refresh_card(&bot, &q, &room).await;
        }
        Err(e) => answer_failure(&bot, &q, e).await?,
    }

    Ok(())
}

/// Checks the user may comment on the room, then waits for their next text.
async fn request_comment(
    bot: &Bot,
    q: &CallbackQuery,
    state: &AppState,
    actor: &Actor,
    room_id: i64,
) -> HandlerResult {
    let room = match authorize(&state.db.pool, actor, room_id).await {
        Ok(room) => room,
        Err(e) => return answer_failure(bot, q, e).await,
    };

    state
        .pending
        .set(actor.user_id, PendingAction::AwaitComment { room_id }, Utc::now())
        .await;
    bot.answer_callback_query(q.id.clone()).await?;

    if let Some(message) = &q.message {
        bot.send_message(
            message.chat.id,
            format!("Напишите комментарий к №{} одним сообщением.", room.room_no),
        )
        .await?;
    }
    Ok(())
}

async fn answer_failure(bot: &Bot, q: &CallbackQuery, error: HousekeepingError) -> HandlerResult {
    let (text, alert) = match &error {
        HousekeepingError::Forbidden { .. } => (FORBIDDEN_TEXT, true),
        HousekeepingError::RoomNotFound(_) => (NOT_FOUND_TEXT, true),
        _ => {
            tracing::error!("Room action failed: {}", error);
            (FAILED_TEXT, false)
        }
    };

    bot.answer_callback_query(q.id.clone())
        .text(text)
        .show_alert(alert)
        .await?;
    Ok(())
}

/// Redraws the card the button belonged to.
async fn refresh_card(bot: &Bot, q: &CallbackQuery, room: &RoomAssignment) {
    let Some(message) = &q.message else {
        return;
    };

    if let Err(e) = bot
        .edit_message_text(message.chat.id, message.id, room_card_text(room))
        .reply_markup(room_keyboard(room))
        .await
    {
        tracing::debug!("Could not refresh card for room {}: {}", room.room_no, e);
    }
}
