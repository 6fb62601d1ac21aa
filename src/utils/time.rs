use chrono::{DateTime, TimeZone, Utc};

/// Converts minutes to milliseconds
pub const fn minutes_ms(minutes: i64) -> i64 {
    minutes * 60 * 1000
}

/// Current wall-clock time as Unix milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Converts Unix milliseconds to a UTC timestamp, `None` when out of range.
pub fn datetime_from_ms(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
