use chrono::{NaiveDate, NaiveTime};
use housekeeping_bot::utils::datetime::*;
use housekeeping_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_staff_names() {
        let valid_names = vec![
            "Sevara".to_string(),
            "Севара".to_string(),
            "Gulnoz A.".to_string(),
            "Анна-Мария".to_string(),
            "Я".repeat(MAX_STAFF_NAME_CHARS),
        ];

        for name in valid_names {
            assert!(validate_staff_name(&name).is_ok(), "Should accept name: {}", name);
        }
    }

    #[test]
    fn test_invalid_staff_names() {
        let invalid_names = vec![
            "".to_string(),
            "   ".to_string(),
            "Doe; Jane".to_string(),
            "Doe, Jane".to_string(),
            "Line\nbreak".to_string(),
            "Я".repeat(MAX_STAFF_NAME_CHARS + 1),
        ];

        for name in invalid_names {
            assert!(validate_staff_name(&name).is_err(), "Should reject name: {:?}", name);
        }
    }

    #[test]
    fn test_comment_limits_count_characters_not_bytes() {
        // Cyrillic letters are two bytes each in UTF-8.
        assert!(validate_comment(&"ж".repeat(MAX_COMMENT_CHARS)).is_ok());
        assert!(validate_comment(&"ж".repeat(MAX_COMMENT_CHARS + 1)).is_err());
    }

    #[test]
    fn test_valid_telegram_chat_ids() {
        let valid_chat_ids = vec![
            -1001234567890_i64, // Supergroup
            -987654321_i64,     // Group
            123456789_i64,      // Private chat
            7_000_000_000_i64,  // Newer user ids exceed 32 bits
        ];

        for chat_id in valid_chat_ids {
            assert!(validate_telegram_chat_id(chat_id).is_ok(), "Should accept chat_id: {}", chat_id);
        }
    }

    #[test]
    fn test_invalid_telegram_chat_ids() {
        for chat_id in [0_i64, -3_000_000_000_000, i64::MAX] {
            assert!(validate_telegram_chat_id(chat_id).is_err(), "Should reject chat_id: {}", chat_id);
        }
    }

    #[test]
    fn test_plan_upload_metadata() {
        assert!(validate_plan_upload(Some("plan_17.05.csv"), 2048).is_ok());
        assert!(validate_plan_upload(Some("plan.csv "), MAX_PLAN_FILE_BYTES).is_ok());

        for (name, size) in [
            (Some("plan.txt"), 10),
            (Some("plan.csv.exe"), 10),
            (None, 10),
            (Some("huge.csv"), MAX_PLAN_FILE_BYTES + 1),
        ] {
            assert!(validate_plan_upload(name, size).is_err(), "Should reject {:?} ({} bytes)", name, size);
        }
    }

    #[test]
    fn test_timezones() {
        assert!(validate_timezone("Asia/Tashkent").is_ok());
        assert!(validate_timezone(" Europe/Moscow ").is_ok());
        assert!(validate_timezone("UTC+5").is_err());
        assert!(validate_timezone("").is_err());
    }

    #[test]
    fn test_work_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(parse_work_date("2024-05-17").unwrap(), expected);
        assert_eq!(parse_work_date("17.05.2024").unwrap(), expected);
        assert_eq!(parse_work_date(" 2024-05-17 ").unwrap(), expected);
        assert!(parse_work_date("2024-02-30").is_err());
        assert!(parse_work_date("tomorrow").is_err());
    }

    #[test]
    fn test_empty_work_date_uses_default() {
        let default = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        assert_eq!(work_date_or("", default).unwrap(), default);
        assert_eq!(work_date_or("  ", default).unwrap(), default);
        assert!(work_date_or("18/05/2024", default).is_err());
    }

    #[test]
    fn test_local_report_time_to_utc_cron() {
        let reference = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let six_pm = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

        // Tashkent is UTC+5 all year.
        assert_eq!(daily_cron_utc(six_pm, chrono_tz::Asia::Tashkent, reference), "0 0 13 * * *");
        assert_eq!(daily_cron_utc(six_pm, chrono_tz::UTC, reference), "0 0 18 * * *");

        let late = NaiveTime::from_hms_opt(23, 55, 0).unwrap();
        assert_eq!(daily_cron_utc(late, chrono_tz::Asia::Tashkent, reference), "0 55 18 * * *");
    }
}
