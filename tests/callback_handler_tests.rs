use chrono::NaiveDate;
use housekeeping_bot::bot::keyboard::{room_keyboard, RoomCallback};
use housekeeping_bot::database::models::*;
use teloxide::types::InlineKeyboardButtonKind;

fn room(status: RoomStatus, cleaning_type: CleaningType) -> RoomAssignment {
    RoomAssignment {
        id: 42,
        work_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        room_no: 101,
        staff_name: Some("Sevara".to_string()),
        staff_user_id: None,
        cleaning_type,
        status,
        comment: None,
        updated_by: None,
        updated_at: String::new(),
    }
}

fn callback_data(markup: &teloxide::types::InlineKeyboardMarkup) -> Vec<(String, String)> {
    markup
        .inline_keyboard
        .iter()
        .flatten()
        .map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => (button.text.clone(), data.clone()),
            other => panic!("unexpected button kind {other:?}"),
        })
        .collect()
}

#[test]
fn test_parse_status_callback() {
    assert_eq!(
        RoomCallback::parse("st:42:done").unwrap(),
        RoomCallback::SetStatus {
            room_id: 42,
            status: RoomStatus::Done,
        }
    );
    assert_eq!(
        RoomCallback::parse("st:42:not_done").unwrap(),
        RoomCallback::SetStatus {
            room_id: 42,
            status: RoomStatus::NotDone,
        }
    );
}

#[test]
fn test_parse_type_and_comment_callbacks() {
    assert_eq!(RoomCallback::parse("ty:7").unwrap(), RoomCallback::ToggleType { room_id: 7 });
    assert_eq!(RoomCallback::parse("cm:7").unwrap(), RoomCallback::Comment { room_id: 7 });
    assert_eq!(RoomCallback::parse("cm:7").unwrap().room_id(), 7);
}

#[test]
fn test_parse_rejects_malformed_data() {
    for data in [
        "",
        "st:42",
        "st:42:maybe",
        "st:abc:done",
        "ty:-3",
        "ty:0",
        "cm:",
        "toggle:42",
        "session:opt:yes",
    ] {
        assert!(RoomCallback::parse(data).is_err(), "accepted '{data}'");
    }
}

#[test]
fn test_encoded_callbacks_parse_back() {
    let callbacks = [
        RoomCallback::SetStatus {
            room_id: 9_007_199_254,
            status: RoomStatus::Done,
        },
        RoomCallback::ToggleType { room_id: 1 },
        RoomCallback::Comment { room_id: 12345 },
    ];
    for callback in callbacks {
        let encoded = callback.encode();
        assert!(encoded.len() <= 64);
        assert_eq!(RoomCallback::parse(&encoded).unwrap(), callback);
    }
}

#[test]
fn test_keyboard_for_unfinished_room() {
    let buttons = callback_data(&room_keyboard(&room(RoomStatus::NotDone, CleaningType::Routine)));

    assert_eq!(
        buttons,
        vec![
            ("✅ Убрано".to_string(), "st:42:done".to_string()),
            ("🔁 Тип: Текущая".to_string(), "ty:42".to_string()),
            ("📝 Комментарий".to_string(), "cm:42".to_string()),
        ]
    );
}

#[test]
fn test_keyboard_for_finished_room_offers_undo() {
    let buttons = callback_data(&room_keyboard(&room(RoomStatus::Done, CleaningType::Full)));

    assert_eq!(buttons[0], ("↩️ Отметить НЕ убрано".to_string(), "st:42:not_done".to_string()));
    assert_eq!(buttons[1].0, "🔁 Тип: Полная");
}
