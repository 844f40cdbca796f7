use std::time::{SystemTime, UNIX_EPOCH};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const NANOS_PER_MILLI: i128 = 1_000_000;

#[must_use]
pub fn unix_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| {
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Fixed-width UTC timestamp so stored values sort lexically in time order.
#[must_use]
pub fn format_unix_ms(timestamp_unix_ms: u64) -> String {
    let nanos = i128::from(timestamp_unix_ms)
        .checked_mul(NANOS_PER_MILLI)
        .unwrap_or(0);
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.millisecond()
    )
}

#[must_use]
pub fn now_utc_timestamp() -> String {
    format_unix_ms(unix_timestamp_millis())
}

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const ISO_DATETIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const ISO_DATETIME_MICROS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");
const PARSE_DATETIME_T: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const PARSE_DATETIME_SPACE: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);

#[must_use]
pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_default()
}

/// ISO-8601 without offset; fractional seconds only when present.
#[must_use]
pub fn format_iso_datetime(value: PrimitiveDateTime) -> String {
    let description = if value.microsecond() == 0 {
        ISO_DATETIME
    } else {
        ISO_DATETIME_MICROS
    };
    value.format(description).unwrap_or_default()
}

/// Accepts `YYYY-MM-DD`.
#[must_use]
pub fn parse_iso_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), ISO_DATE).ok()
}

/// Accepts `YYYY-MM-DD HH:MM:SS[.fraction]` with either a space or `T` separator.
#[must_use]
pub fn parse_iso_datetime(raw: &str) -> Option<PrimitiveDateTime> {
    let trimmed = raw.trim();
    PrimitiveDateTime::parse(trimmed, PARSE_DATETIME_T)
        .or_else(|_| PrimitiveDateTime::parse(trimmed, PARSE_DATETIME_SPACE))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::{
        format_iso_date, format_iso_datetime, format_unix_ms, parse_iso_date, parse_iso_datetime,
    };

    #[test]
    fn formats_fixed_width_utc_millis() {
        assert_eq!(format_unix_ms(1_770_274_803_042), "2026-02-05T07:00:03.042Z");
        assert_eq!(format_unix_ms(0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn round_trips_calendar_dates() {
        let date = parse_iso_date("2024-02-29").expect("leap day should parse");
        assert_eq!(format_iso_date(date), "2024-02-29");
        assert!(parse_iso_date("2023-02-29").is_none());
        assert!(parse_iso_date("2024-1-5").is_none());
        assert!(parse_iso_date("not a date").is_none());
    }

    #[test]
    fn parses_space_and_t_separated_datetimes() {
        let spaced = parse_iso_datetime("2024-03-01 08:15:30").expect("space form should parse");
        assert_eq!(format_iso_datetime(spaced), "2024-03-01T08:15:30");

        let fractional =
            parse_iso_datetime("2024-03-01T08:15:30.25").expect("fraction should parse");
        assert_eq!(format_iso_datetime(fractional), "2024-03-01T08:15:30.250000");

        let spaced_fraction =
            parse_iso_datetime(" 2024-03-01 08:15:30.123456 ").expect("spaced fraction should parse");
        assert_eq!(
            format_iso_datetime(spaced_fraction),
            "2024-03-01T08:15:30.123456"
        );

        assert!(parse_iso_datetime("2024-03-01").is_none());
        assert!(parse_iso_datetime("2024-03-01 08:15:30Z").is_none());
        assert!(parse_iso_datetime("2024-03-01T25:00:00").is_none());
    }
}
