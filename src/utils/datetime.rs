use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Accepts `YYYY-MM-DD` or `DD.MM.YYYY`.
pub fn parse_work_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d.%m.%Y"))
        .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", input))
}

/// An empty argument means `default`.
pub fn work_date_or(input: &str, default: NaiveDate) -> Result<NaiveDate> {
    if input.trim().is_empty() {
        Ok(default)
    } else {
        parse_work_date(input)
    }
}

pub fn format_work_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Six-field cron expression (seconds first) firing daily at the UTC instant
/// matching `local` wall-clock time in `tz` on `reference`.
pub fn daily_cron_utc(local: NaiveTime, tz: Tz, reference: NaiveDate) -> String {
    let utc_time = tz
        .from_local_datetime(&reference.and_time(local))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc).time())
        .unwrap_or(local);

    format!("0 {} {} * * *", utc_time.minute(), utc_time.hour())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_work_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 17);
        assert_eq!(parse_work_date("2024-05-17").ok(), expected);
        assert_eq!(parse_work_date(" 17.05.2024 ").ok(), expected);
        assert!(parse_work_date("17/05/2024").is_err());
        assert!(parse_work_date("2024-02-30").is_err());
    }

    #[test]
    fn test_work_date_or_default() {
        let default = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(work_date_or("  ", default).ok(), Some(default));
        assert!(work_date_or("tomorrow", default).is_err());
    }

    #[test]
    fn test_daily_cron_converts_to_utc() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let six_pm = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

        // Tashkent is UTC+5 all year round.
        assert_eq!(daily_cron_utc(six_pm, chrono_tz::Asia::Tashkent, reference), "0 0 13 * * *");
        assert_eq!(daily_cron_utc(six_pm, chrono_tz::UTC, reference), "0 0 18 * * *");

        let late = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        assert_eq!(daily_cron_utc(late, chrono_tz::Asia::Tashkent, reference), "0 30 21 * * *");
    }
}
