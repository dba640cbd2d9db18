use crate::errors::ThoughtnetError;
use bson::{oid::ObjectId, DateTime};
use chrono::{Datelike, TimeZone, Utc};
use std::str::FromStr;

/**
 * Parse a path segment into an ObjectId
 *
 * @param id - the 24 hex digit string to parse
 * @returns - the ObjectId, or InvalidId if the string is malformed
 */
pub fn parse_object_id(id: &str) -> Result<ObjectId, ThoughtnetError> {
    ObjectId::from_str(id).map_err(|_| ThoughtnetError::InvalidId(id.to_string()))
}

/**
 * Render a stored timestamp for display, e.g. "Oct 7th, 2026 at 03:05 pm" (UTC)
 *
 * @param timestamp - the stored bson datetime
 * @returns - the formatted timestamp
 */
pub fn format_timestamp(timestamp: &DateTime) -> String {
    let datetime = match Utc.timestamp_millis_opt(timestamp.timestamp_millis()).single() {
        Some(datetime) => datetime,
        // outside chrono's range, fall back to bson's own rendering
        None => return timestamp.to_string(),
    };
    let day = datetime.day();
    format!(
        "{} {}{}, {} at {}",
        datetime.format("%b"),
        day,
        ordinal_suffix(day),
        datetime.format("%Y"),
        datetime.format("%I:%M %P")
    )
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn millis(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime {
        let datetime = Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap();
        DateTime::from_millis(datetime.timestamp_millis())
    }

    #[test]
    fn test_ordinal_suffixes() {
        let expected = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (30, "th"),
            (31, "st"),
        ];
        for (day, suffix) in expected {
            assert_eq!(ordinal_suffix(day), suffix, "day {}", day);
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(&millis(2026, 10, 7, 15, 5)),
            "Oct 7th, 2026 at 03:05 pm"
        );
        assert_eq!(
            format_timestamp(&millis(2024, 1, 22, 0, 30)),
            "Jan 22nd, 2024 at 12:30 am"
        );
    }

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert_eq!(
            parse_object_id("not-an-id"),
            Err(ThoughtnetError::InvalidId("not-an-id".to_string()))
        );
    }
}
