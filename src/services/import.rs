use crate::database::models::*;
use crate::error::{HousekeepingError, HousekeepingResult};
use crate::plan::{decode_plan_bytes, parse_plan, PlanRecord, TextEncoding};
use crate::utils::datetime::format_work_date;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// What happened to an uploaded plan file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub work_date: NaiveDate,
    /// Rooms stored for the date after the replace.
    pub inserted: i64,
    pub skipped_lines: usize,
    pub duplicates: usize,
    pub linked_staff: usize,
    pub encoding: TextEncoding,
}

impl ImportSummary {
    /// Message shown to the admin who uploaded the file.
    pub fn describe(&self) -> String {
        let mut text = format!(
            "Загружено {} номеров на {}.",
            self.inserted,
            format_work_date(self.work_date)
        );
        if self.linked_staff > 0 {
            text.push_str(&format!("\nПривязано к сотрудникам: {}.", self.linked_staff));
        }
        if self.duplicates > 0 {
            text.push_str(&format!(
                "\nПовторы номеров: {} (оставлена последняя строка).",
                self.duplicates
            ));
        }
        if self.skipped_lines > 0 {
            text.push_str(&format!("\nПропущено строк: {}.", self.skipped_lines));
        }
        if self.encoding.is_degraded() {
            text.push_str("\nКодировка файла не распознана, часть символов заменена. Сохраните CSV в UTF-8.");
        }
        text.push_str("\n/plan — список, /my — карточки для горничных.");
        text
    }
}

/// Decodes, parses and stores an uploaded plan, replacing the day's rooms.
///
/// A file without a single valid row is rejected with `EmptyPlan` and the
/// stored plan is left as it was.
pub async fn import_plan(
    pool: &SqlitePool,
    work_date: NaiveDate,
    bytes: &[u8],
    actor: &str,
) -> HousekeepingResult<ImportSummary> {
    let decoded = decode_plan_bytes(bytes);
    let plan = parse_plan(&decoded.text);

    tracing::debug!(
        "Parsed plan for {}: {} rows, {} skipped lines, encoding {}",
        work_date,
        plan.records.len(),
        plan.skipped_lines,
        decoded.encoding.label()
    );

    if plan.is_empty() {
        return Err(HousekeepingError::EmptyPlan {
            skipped_lines: plan.skipped_lines,
        });
    }

    let staff_ids = staff_directory(&User::find_named(pool).await?);
    let rooms: Vec<NewRoom> = plan
        .records
        .iter()
        .map(|record| to_new_room(record, &staff_ids))
        .collect();
    let linked_staff = linked_room_count(&rooms);

    let inserted = RoomAssignment::replace_day(pool, work_date, &rooms, actor).await?;

    tracing::info!(
        "Plan for {} replaced by {}: {} rooms ({} duplicates collapsed, {} lines skipped)",
        work_date,
        actor,
        inserted,
        plan.duplicate_rows(),
        plan.skipped_lines
    );

    Ok(ImportSummary {
        work_date,
        inserted,
        skipped_lines: plan.skipped_lines,
        duplicates: plan.duplicate_rows(),
        linked_staff,
        encoding: decoded.encoding,
    })
}

/// Rooms that end up linked to a staff id, counting a repeated room number
/// once by its last row.
pub fn linked_room_count(rooms: &[NewRoom]) -> usize {
    let mut last_row: HashMap<i64, bool> = HashMap::new();
    for room in rooms {
        last_row.insert(room.room_no, room.staff_user_id.is_some());
    }
    last_row.values().filter(|linked| **linked).count()
}

/// Maps normalized names to Telegram ids. Names shared by several users are
/// left out so they never link to the wrong person.
pub fn staff_directory(users: &[User]) -> HashMap<String, i64> {
    let mut directory: HashMap<String, Option<i64>> = HashMap::new();

    for user in users {
        let Some(name) = user.name.as_deref().map(normalize_name) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        directory
            .entry(name)
            .and_modify(|id| *id = None)
            .or_insert(Some(user.tg_id));
    }

    directory
        .into_iter()
        .filter_map(|(name, id)| id.map(|id| (name, id)))
        .collect()
}

fn to_new_room(record: &PlanRecord, staff_ids: &HashMap<String, i64>) -> NewRoom {
    NewRoom {
        room_no: i64::from(record.room_no),
        staff_name: Some(record.staff_name.clone()),
        staff_user_id: staff_ids.get(&normalize_name(&record.staff_name)).copied(),
        cleaning_type: record.cleaning_type,
    }
}
