use thiserror::Error;

/// Failures that are reported back to the user who triggered them.
#[derive(Error, Debug)]
pub enum HousekeepingError {
    #[error("No valid rows found in plan ({skipped_lines} lines skipped)")]
    EmptyPlan { skipped_lines: usize },

    #[error("User {user_id} is not allowed to modify room {room_no}")]
    Forbidden { user_id: i64, room_no: i64 },

    #[error("Room record {0} not found")]
    RoomNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

impl HousekeepingError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, HousekeepingError::Forbidden { .. })
    }
}

pub type HousekeepingResult<T> = Result<T, HousekeepingError>;
