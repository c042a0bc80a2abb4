//! One-line log helpers with fixed prefixes, so a day of bot activity can be
//! grepped by `CMD_`, `DB_OP`, `TIMEOUT` or `SYSTEM`.

use tracing::{debug, error, info, warn};

fn suffix(details: Option<&str>) -> String {
    match details.filter(|d| !d.is_empty()) {
        Some(d) => format!(" - {d}"),
        None => String::new(),
    }
}

pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    info!(
        command,
        user_id,
        chat_id,
        "CMD_START: /{} by {}({}) in chat {}{}",
        command,
        user,
        user_id,
        chat_id,
        suffix(details)
    );
}

pub fn log_command_success(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    info!(
        command,
        user_id,
        chat_id,
        "CMD_SUCCESS: /{} by {}({}) in chat {}{}",
        command,
        user,
        user_id,
        chat_id,
        suffix(details)
    );
}

pub fn log_command_error(command: &str, user: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(
        command,
        user_id,
        chat_id,
        "CMD_ERROR: /{} by {}({}) in chat {} - {}",
        command,
        user,
        user_id,
        chat_id,
        error
    );
}

/// User input that was refused before anything was stored.
pub fn log_validation_error(
    command: &str,
    field: &str,
    value: &str,
    error: &str,
    user: &str,
    user_id: i64,
    chat_id: i64,
) {
    warn!(
        command,
        user_id,
        chat_id,
        "VALIDATION_ERROR: /{} {} '{}' rejected: {} - {}({}) in chat {}",
        command,
        field,
        value,
        error,
        user,
        user_id,
        chat_id
    );
}

pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    debug!("DB_OP: {} on {}{}", operation, table, suffix(details));
}

pub fn log_timeout(operation: &str, duration_secs: u64, details: Option<&str>) {
    warn!("TIMEOUT: {} after {}s{}", operation, duration_secs, suffix(details));
}

pub fn log_system_event(event: &str, details: Option<&str>) {
    info!("SYSTEM: {}{}", event, suffix(details));
}
