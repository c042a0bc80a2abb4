use anyhow::{anyhow, Result};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::database::models::{RoomAssignment, RoomStatus};

/// Payload of a room card button. Encoded as `st:<id>:<status>`, `ty:<id>`
/// or `cm:<id>`, well under Telegram's 64 byte callback limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCallback {
    SetStatus { room_id: i64, status: RoomStatus },
    ToggleType { room_id: i64 },
    Comment { room_id: i64 },
}

impl RoomCallback {
    pub fn parse(data: &str) -> Result<Self> {
        let parts: Vec<&str> = data.split(':').collect();
        let room_id = |raw: &str| -> Result<i64> {
            raw.parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| anyhow!("Invalid room id in callback data '{}'", data))
        };

        match parts.as_slice() {
            ["st", id, status] => Ok(RoomCallback::SetStatus {
                room_id: room_id(*id)?,
                status: RoomStatus::parse(*status)
                    .ok_or_else(|| anyhow!("Invalid status in callback data '{}'", data))?,
            }),
            ["ty", id] => Ok(RoomCallback::ToggleType {
                room_id: room_id(*id)?,
            }),
            ["cm", id] => Ok(RoomCallback::Comment {
                room_id: room_id(*id)?,
            }),
            _ => Err(anyhow!("Unknown callback data '{}'", data)),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            RoomCallback::SetStatus { room_id, status } => format!("st:{}:{}", room_id, status.as_str()),
            RoomCallback::ToggleType { room_id } => format!("ty:{room_id}"),
            RoomCallback::Comment { room_id } => format!("cm:{room_id}"),
        }
    }

    pub fn room_id(&self) -> i64 {
        match self {
            RoomCallback::SetStatus { room_id, .. }
            | RoomCallback::ToggleType { room_id }
            | RoomCallback::Comment { room_id } => *room_id,
        }
    }
}

pub fn room_keyboard(room: &RoomAssignment) -> InlineKeyboardMarkup {
    let next_status = room.status.opposite();
    let status_label = match next_status {
        RoomStatus::Done => "✅ Убрано".to_string(),
        RoomStatus::NotDone => "↩️ Отметить НЕ убрано".to_string(),
    };

    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            status_label,
            RoomCallback::SetStatus {
                room_id: room.id,
                status: next_status,
            }
            .encode(),
        )],
        vec![InlineKeyboardButton::callback(
            format!("🔁 Тип: {}", room.cleaning_type.label()),
            RoomCallback::ToggleType { room_id: room.id }.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "📝 Комментарий".to_string(),
            RoomCallback::Comment { room_id: room.id }.encode(),
        )],
    ])
}
