use teloxide::prelude::*;

use super::{date_argument, Sender};
use crate::bot::keyboard::room_keyboard;
use crate::bot::HandlerResult;
use crate::database::models::{RoomAssignment, User};
use crate::services::report::{plan_text, room_card_text, split_message};
use crate::state::AppState;
use crate::utils::datetime::format_work_date;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};

pub async fn handle_plan(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("plan", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    let today = state.today().await;
    let Some(work_date) = date_argument(&feedback, &arg, today, "/plan 2024-05-17").await? else {
        return Ok(());
    };

    let rooms = match RoomAssignment::find_by_date(&state.db.pool, work_date).await {
        Ok(rooms) => rooms,
        Err(e) => {
            log_command_error("plan", &sender.display_name, sender.user_id, msg.chat.id.0, &e.to_string());
            feedback.error("Не удалось загрузить план. Попробуйте позже.").await?;
            return Ok(());
        }
    };

    if rooms.is_empty() {
        feedback
            .info(&format!(
                "План на {} пуст. Админ может загрузить CSV через /upload_plan.",
                format_work_date(work_date)
            ))
            .await?;
        return Ok(());
    }

    for chunk in split_message(&plan_text(work_date, &rooms)) {
        bot.send_message(msg.chat.id, chunk).await?;
    }

    log_command_success(
        "plan",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(&format!("{} rooms on {}", rooms.len(), work_date)),
    );
    Ok(())
}

/// Sends one card with buttons per room assigned to the sender.
pub async fn handle_my(bot: Bot, msg: Message, arg: String, state: &AppState) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let Some(sender) = Sender::of(&msg) else {
        return Ok(());
    };
    log_command_start("my", &sender.display_name, sender.user_id, msg.chat.id.0, Some(&arg));

    let today = state.today().await;
    let Some(work_date) = date_argument(&feedback, &arg, today, "/my 2024-05-17").await? else {
        return Ok(());
    };

    let registered_name = User::find(&state.db.pool, sender.user_id)
        .await?
        .and_then(|user| user.name);

    let rooms = RoomAssignment::find_for_staff(
        &state.db.pool,
        work_date,
        Some(sender.user_id),
        registered_name.as_deref(),
    )
    .await?;

    if rooms.is_empty() {
        let hint = if registered_name.is_none() {
            "\nЗадайте своё имя как в плане: /iam Севара"
        } else {
            ""
        };
        feedback
            .info(&format!(
                "На {} за вами нет закреплённых номеров.{}",
                format_work_date(work_date),
                hint
            ))
            .await?;
        return Ok(());
    }

    for room in &rooms {
        bot.send_message(msg.chat.id, room_card_text(room))
            .reply_markup(room_keyboard(room))
            .await?;
    }

    log_command_success(
        "my",
        &sender.display_name,
        sender.user_id,
        msg.chat.id.0,
        Some(&format!("{} cards for {}", rooms.len(), work_date)),
    );
    Ok(())
}
