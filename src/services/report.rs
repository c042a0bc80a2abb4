use crate::database::models::*;
use crate::utils::datetime::format_work_date;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};

const CSV_HEADER: [&str; 6] = ["work_date", "room_no", "staff", "cleaning_type", "status", "comment"];
const XLSX_HEADER: [&str; 6] = ["Дата", "№ Номера", "Горничная", "Тип", "Статус", "Комментарий"];
const XLSX_SHEET: &str = "Уборка";
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
/// Telegram rejects text messages longer than 4096 characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

pub fn report_text(work_date: NaiveDate, stats: &DailyStats) -> String {
    format!(
        "📊 Отчёт на {}\n\
        Всего: {} • Убрано: {} ({}%) • Осталось: {}\n\
        Полная уборка: {}/{}",
        format_work_date(work_date),
        stats.total,
        stats.done,
        stats.done_percent(),
        stats.remaining,
        stats.full_done,
        stats.full_total
    )
}

pub fn plan_text(work_date: NaiveDate, rooms: &[RoomAssignment]) -> String {
    let mut text = format!("🧾 План на {}:", format_work_date(work_date));
    for room in rooms {
        text.push_str(&format!(
            "\n• №{} — {}, горничная: {} — {}",
            room.room_no,
            room.cleaning_type.label(),
            room.staff_name.as_deref().unwrap_or("-"),
            room.status.label()
        ));
        if let Some(comment) = room.comment.as_deref().filter(|c| !c.is_empty()) {
            text.push_str(&format!(" — 📝 {comment}"));
        }
    }
    text
}

/// Short text shown above a room's inline keyboard.
pub fn room_card_text(room: &RoomAssignment) -> String {
    let mut text = format!(
        "№{} • {} • {} • {}",
        room.room_no,
        room.cleaning_type.label(),
        room.staff_name.as_deref().unwrap_or("-"),
        room.status.label()
    );
    if let Some(comment) = room.comment.as_deref().filter(|c| !c.is_empty()) {
        text.push_str(&format!("\n📝 {comment}"));
    }
    text
}

pub fn export_file_name(work_date: NaiveDate, extension: &str) -> String {
    format!("cleaning_{}.{}", format_work_date(work_date), extension)
}

/// Splits long text on line boundaries into Telegram-sized messages.
pub fn split_message(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for line in text.lines() {
        let line_chars = line.chars().count();
        if current_chars > 0 && current_chars + 1 + line_chars > MAX_MESSAGE_CHARS {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if current_chars > 0 {
            current.push('\n');
            current_chars += 1;
        }
        current.push_str(line);
        current_chars += line_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// UTF-8 CSV with a byte-order mark so spreadsheet apps detect the encoding.
pub fn export_csv(work_date: NaiveDate, rooms: &[RoomAssignment]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(CSV_HEADER)?;

    let date = format_work_date(work_date);
    for room in rooms {
        let room_no = room.room_no.to_string();
        writer.write_record([
            date.as_str(),
            room_no.as_str(),
            room.staff_name.as_deref().unwrap_or(""),
            room.cleaning_type.label(),
            room.status.label(),
            room.comment.as_deref().unwrap_or(""),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to finish CSV export: {}", e.error()))
}

pub fn export_xlsx(work_date: NaiveDate, rooms: &[RoomAssignment]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date = format_work_date(work_date);

    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET)?;

    for (col, title) in XLSX_HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }

    for (index, room) in rooms.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, date.as_str())?;
        sheet.write_number(row, 1, room.room_no as f64)?;
        sheet.write_string(row, 2, room.staff_name.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 3, room.cleaning_type.label())?;
        sheet.write_string(row, 4, room.status.label())?;
        sheet.write_string(row, 5, room.comment.as_deref().unwrap_or(""))?;
    }
    sheet.autofit();

    Ok(workbook.save_to_buffer()?)
}
