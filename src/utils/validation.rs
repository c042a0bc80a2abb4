use anyhow::{anyhow, Result};
use chrono_tz::Tz;

pub const MAX_COMMENT_CHARS: usize = 500;
pub const MAX_STAFF_NAME_CHARS: usize = 64;
pub const MAX_PLAN_FILE_BYTES: u32 = 1024 * 1024;
const MAX_USER_CHAT_ID: i64 = 1 << 52;

/// Name registered with `/iam`, later matched against plan staff names.
pub fn validate_staff_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Name cannot be empty"));
    }

    if name.chars().count() > MAX_STAFF_NAME_CHARS {
        return Err(anyhow!(
            "Name cannot be longer than {} characters",
            MAX_STAFF_NAME_CHARS
        ));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Name cannot contain line breaks"));
    }

    // Delimiters would make the name impossible to reproduce in a plan file.
    if name.contains(',') || name.contains(';') {
        return Err(anyhow!("Name cannot contain ',' or ';'"));
    }

    Ok(name.to_string())
}

pub fn validate_comment(comment: &str) -> Result<String> {
    let comment = comment.trim();

    if comment.is_empty() {
        return Err(anyhow!("Comment cannot be empty"));
    }

    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(anyhow!(
            "Comment cannot be longer than {} characters",
            MAX_COMMENT_CHARS
        ));
    }

    Ok(comment.to_string())
}

pub fn validate_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| anyhow!("Unknown timezone '{}'", name.trim()))
}

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    // Telegram chat IDs should be non-zero
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // User ids fit in 52 bits.
    if chat_id > MAX_USER_CHAT_ID {
        return Err(anyhow!("Invalid user chat ID range"));
    }

    // Supergroup ids start around -100xxxxxxxxxx
    if chat_id < -2000000000000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}

/// Checks the upload metadata before anything is downloaded.
pub fn validate_plan_upload(file_name: Option<&str>, size: u32) -> Result<()> {
    let is_csv = file_name
        .map(|name| name.trim().to_lowercase().ends_with(".csv"))
        .unwrap_or(false);

    if !is_csv {
        return Err(anyhow!("Plan must be a .csv file"));
    }

    if size > MAX_PLAN_FILE_BYTES {
        return Err(anyhow!(
            "Plan file is too large ({} bytes, max {})",
            size,
            MAX_PLAN_FILE_BYTES
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_staff_name() {
        assert_eq!(validate_staff_name("  Севара ").unwrap(), "Севара");
        assert!(validate_staff_name("").is_err());
        assert!(validate_staff_name("   ").is_err());
        assert!(validate_staff_name("Two\nLines").is_err());
        assert!(validate_staff_name("Doe, Jane").is_err());
        assert!(validate_staff_name(&"я".repeat(64)).is_ok());
        assert!(validate_staff_name(&"я".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_comment() {
        assert_eq!(validate_comment(" towels missing ").unwrap(), "towels missing");
        assert!(validate_comment("\t\n").is_err());
        assert!(validate_comment(&"a".repeat(MAX_COMMENT_CHARS)).is_ok());
        assert!(validate_comment(&"a".repeat(MAX_COMMENT_CHARS + 1)).is_err());
    }

    #[test]
    fn test_validate_timezone() {
        assert_eq!(validate_timezone("Asia/Tashkent").unwrap(), chrono_tz::Asia::Tashkent);
        assert!(validate_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_validate_plan_upload() {
        assert!(validate_plan_upload(Some("plan.csv"), 120).is_ok());
        assert!(validate_plan_upload(Some("PLAN.CSV"), 120).is_ok());
        assert!(validate_plan_upload(Some("plan.xlsx"), 120).is_err());
        assert!(validate_plan_upload(None, 120).is_err());
        assert!(validate_plan_upload(Some("plan.csv"), MAX_PLAN_FILE_BYTES + 1).is_err());
    }

    #[test]
    fn test_validate_telegram_chat_id() {
        assert!(validate_telegram_chat_id(12345).is_ok());
        assert!(validate_telegram_chat_id(-1001234567890).is_ok());
        assert!(validate_telegram_chat_id(0).is_err());
        assert!(validate_telegram_chat_id(-3000000000000).is_err());
    }
}
