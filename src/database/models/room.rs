use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningType {
    Full,
    Routine,
}

impl CleaningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningType::Full => "full",
            CleaningType::Routine => "routine",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CleaningType::Full => "Полная",
            CleaningType::Routine => "Текущая",
        }
    }

    /// Stored values; anything unrecognised reads as `Routine`.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "full" => CleaningType::Full,
            _ => CleaningType::Routine,
        }
    }

    /// Free-form plan column; only an explicit "full" spelling yields `Full`.
    pub fn from_plan_field(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "full" | "полная" | "генеральная" => CleaningType::Full,
            _ => CleaningType::Routine,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            CleaningType::Full => CleaningType::Routine,
            CleaningType::Routine => CleaningType::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    NotDone,
    Done,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::NotDone => "not_done",
            RoomStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::NotDone => "Не убрано",
            RoomStatus::Done => "Убрано",
        }
    }

    pub fn from_stored(value: &str) -> Self {
        match value {
            "done" => RoomStatus::Done,
            _ => RoomStatus::NotDone,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "done" => Some(RoomStatus::Done),
            "not_done" => Some(RoomStatus::NotDone),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            RoomStatus::NotDone => RoomStatus::Done,
            RoomStatus::Done => RoomStatus::NotDone,
        }
    }
}

/// A room scheduled for cleaning on a given work date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub id: i64,
    pub work_date: NaiveDate,
    pub room_no: i64,
    pub staff_name: Option<String>,
    pub staff_user_id: Option<i64>,
    pub cleaning_type: CleaningType,
    pub status: RoomStatus,
    pub comment: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: String,
}

impl<'r> FromRow<'r, SqliteRow> for RoomAssignment {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let work_date: String = row.try_get("work_date")?;
        let work_date = NaiveDate::parse_from_str(&work_date, "%Y-%m-%d").map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "work_date".to_string(),
                source: Box::new(e),
            }
        })?;
        let cleaning_type: String = row.try_get("cleaning_type")?;
        let status: String = row.try_get("status")?;

        Ok(RoomAssignment {
            id: row.try_get("id")?,
            work_date,
            room_no: row.try_get("room_no")?,
            staff_name: row.try_get("staff_name")?,
            staff_user_id: row.try_get("staff_user_id")?,
            cleaning_type: CleaningType::from_stored(&cleaning_type),
            status: RoomStatus::from_stored(&status),
            comment: row.try_get("comment")?,
            updated_by: row.try_get("updated_by")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Row to insert when a plan for a date is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub room_no: i64,
    pub staff_name: Option<String>,
    pub staff_user_id: Option<i64>,
    pub cleaning_type: CleaningType,
}

/// Aggregates for one work date, derived on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub total: i64,
    pub done: i64,
    pub remaining: i64,
    pub full_total: i64,
    pub full_done: i64,
}

impl DailyStats {
    pub fn from_rooms(rooms: &[RoomAssignment]) -> Self {
        let total = rooms.len() as i64;
        let done = rooms.iter().filter(|r| r.status == RoomStatus::Done).count() as i64;
        let full = rooms
            .iter()
            .filter(|r| r.cleaning_type == CleaningType::Full);
        let full_total = full.clone().count() as i64;
        let full_done = full.filter(|r| r.status == RoomStatus::Done).count() as i64;

        DailyStats {
            total,
            done,
            remaining: total - done,
            full_total,
            full_done,
        }
    }

    pub async fn for_date(pool: &SqlitePool, work_date: NaiveDate) -> Result<Self, sqlx::Error> {
        let (total, done, full_total, full_done) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'done' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN cleaning_type = 'full' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN cleaning_type = 'full' AND status = 'done' THEN 1 ELSE 0 END), 0)
            FROM rooms
            WHERE work_date = ?
            "#,
        )
        .bind(date_key(work_date))
        .fetch_one(pool)
        .await?;

        Ok(DailyStats {
            total,
            done,
            remaining: total - done,
            full_total,
            full_done,
        })
    }

    pub fn done_percent(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.done as f64 * 100.0 / self.total as f64).round() as i64
        }
    }
}

const SELECT_ROOM: &str = "SELECT id, work_date, room_no, staff_name, staff_user_id, cleaning_type, status, comment, updated_by, updated_at FROM rooms";

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl RoomAssignment {
    /// Deletes the date's plan and inserts `rooms` in one transaction.
    ///
    /// Repeated room numbers collapse onto one row; the later row wins.
    /// Returns the number of rooms stored for the date afterwards.
    pub async fn replace_day(
        pool: &SqlitePool,
        work_date: NaiveDate,
        rooms: &[NewRoom],
        actor: &str,
    ) -> Result<i64, sqlx::Error> {
        let day = date_key(work_date);
        let now = Utc::now().to_rfc3339();
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM rooms WHERE work_date = ?")
            .bind(&day)
            .execute(&mut *tx)
            .await?;

        for room in rooms {
            sqlx::query(
                r#"
                INSERT INTO rooms (work_date, room_no, staff_name, staff_user_id, cleaning_type, status, updated_by, updated_at)
                VALUES (?, ?, ?, ?, ?, 'not_done', ?, ?)
                ON CONFLICT (work_date, room_no) DO UPDATE SET
                    staff_name = excluded.staff_name,
                    staff_user_id = excluded.staff_user_id,
                    cleaning_type = excluded.cleaning_type,
                    updated_by = excluded.updated_by,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&day)
            .bind(room.room_no)
            .bind(&room.staff_name)
            .bind(room.staff_user_id)
            .bind(room.cleaning_type.as_str())
            .bind(actor)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        let stored = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms WHERE work_date = ?")
            .bind(&day)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        log_database_operation(
            "replace_day",
            "rooms",
            Some(&format!("{} rows for {} by {}", stored, day, actor)),
        );
        Ok(stored)
    }

    pub async fn find_by_date(
        pool: &SqlitePool,
        work_date: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, RoomAssignment>(&format!(
            "{SELECT_ROOM} WHERE work_date = ? ORDER BY room_no"
        ))
        .bind(date_key(work_date))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, RoomAssignment>(&format!("{SELECT_ROOM} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rooms linked to `user_id`; when none are linked, rooms whose staff name
    /// matches `name` ignoring case.
    pub async fn find_for_staff(
        pool: &SqlitePool,
        work_date: NaiveDate,
        user_id: Option<i64>,
        name: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if let Some(user_id) = user_id {
            let linked = sqlx::query_as::<_, RoomAssignment>(&format!(
                "{SELECT_ROOM} WHERE work_date = ? AND staff_user_id = ? ORDER BY room_no"
            ))
            .bind(date_key(work_date))
            .bind(user_id)
            .fetch_all(pool)
            .await?;
            if !linked.is_empty() {
                return Ok(linked);
            }
        }

        let Some(name) = name.map(normalize_name).filter(|n| !n.is_empty()) else {
            return Ok(Vec::new());
        };

        // SQLite's LOWER() only folds ASCII, so compare in Rust.
        let rooms = Self::find_by_date(pool, work_date).await?;
        Ok(rooms
            .into_iter()
            .filter(|room| {
                room.staff_name
                    .as_deref()
                    .is_some_and(|staff| normalize_name(staff) == name)
            })
            .collect())
    }

    pub async fn set_status(
        pool: &SqlitePool,
        id: i64,
        status: RoomStatus,
        actor: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE rooms SET status = ?, updated_by = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(actor)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips Full and Routine, returning the new type.
    pub async fn toggle_cleaning_type(
        pool: &SqlitePool,
        id: i64,
        actor: &str,
    ) -> Result<Option<CleaningType>, sqlx::Error> {
        // One statement, so a concurrent writer is waited for via busy_timeout.
        let next = sqlx::query_scalar::<_, String>(
            "UPDATE rooms SET cleaning_type = CASE cleaning_type WHEN 'full' THEN 'routine' ELSE 'full' END, \
             updated_by = ?, updated_at = ? WHERE id = ? RETURNING cleaning_type",
        )
        .bind(actor)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(next.map(|stored| CleaningType::from_stored(&stored)))
    }

    pub async fn set_comment(
        pool: &SqlitePool,
        id: i64,
        comment: &str,
        actor: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE rooms SET comment = ?, updated_by = ?, updated_at = ? WHERE id = ?",
        )
        .bind(comment)
        .bind(actor)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_day(pool: &SqlitePool, work_date: NaiveDate) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE work_date = ?")
            .bind(date_key(work_date))
            .execute(pool)
            .await?;

        log_database_operation(
            "delete_day",
            "rooms",
            Some(&format!("{} rows for {}", result.rows_affected(), work_date)),
        );
        Ok(result.rows_affected())
    }

    /// Copies the not-done rooms of `from` into `to`, skipping room numbers
    /// already planned there. Returns how many rooms were copied.
    pub async fn carry_over(
        pool: &SqlitePool,
        from: NaiveDate,
        to: NaiveDate,
        actor: &str,
    ) -> Result<u64, sqlx::Error> {
        let target = date_key(to);
        let result = sqlx::query(
            r#"
            INSERT INTO rooms (work_date, room_no, staff_name, staff_user_id, cleaning_type, status, comment, updated_by, updated_at)
            SELECT ?, r.room_no, r.staff_name, r.staff_user_id, r.cleaning_type, 'not_done', r.comment, ?, ?
            FROM rooms r
            WHERE r.work_date = ?
              AND r.status = 'not_done'
              AND NOT EXISTS (
                  SELECT 1 FROM rooms t WHERE t.work_date = ? AND t.room_no = r.room_no
              )
            ORDER BY r.room_no
            "#,
        )
        .bind(&target)
        .bind(actor)
        .bind(Utc::now().to_rfc3339())
        .bind(date_key(from))
        .bind(&target)
        .execute(pool)
        .await?;

        log_database_operation(
            "carry_over",
            "rooms",
            Some(&format!("{} rows {} -> {} by {}", result.rows_affected(), from, to, actor)),
        );
        Ok(result.rows_affected())
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_an_involution() {
        for kind in [CleaningType::Full, CleaningType::Routine] {
            assert_eq!(kind.toggled().toggled(), kind);
            assert_ne!(kind.toggled(), kind);
        }
    }

    #[test]
    fn test_unknown_stored_values_fall_back() {
        assert_eq!(CleaningType::from_stored("Полная"), CleaningType::Routine);
        assert_eq!(CleaningType::from_stored("full"), CleaningType::Full);
        assert_eq!(RoomStatus::from_stored("in_progress"), RoomStatus::NotDone);
        assert_eq!(RoomStatus::parse("done"), Some(RoomStatus::Done));
        assert_eq!(RoomStatus::parse("Убрано"), None);
    }

    #[test]
    fn test_plan_field_normalization() {
        assert_eq!(CleaningType::from_plan_field(" ПОЛНАЯ "), CleaningType::Full);
        assert_eq!(CleaningType::from_plan_field("Full"), CleaningType::Full);
        assert_eq!(CleaningType::from_plan_field("текущая"), CleaningType::Routine);
        assert_eq!(CleaningType::from_plan_field("whatever"), CleaningType::Routine);
    }

    #[test]
    fn test_done_percent_rounding() {
        let stats = DailyStats {
            total: 3,
            done: 2,
            remaining: 1,
            full_total: 0,
            full_done: 0,
        };
        assert_eq!(stats.done_percent(), 67);
        assert_eq!(DailyStats::default().done_percent(), 0);
    }
}
