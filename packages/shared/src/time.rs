use chrono::{DateTime, FixedOffset, Utc};

/// Current Unix timestamp in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as RFC 3339 in JST.
pub fn millis_to_jst_rfc3339(millis: i64) -> String {
    // JST is UTC+9
    let (Some(jst_offset), Some(utc)) = (
        FixedOffset::east_opt(9 * 3600),
        DateTime::<Utc>::from_timestamp_millis(millis),
    ) else {
        return millis.to_string();
    };
    utc.with_timezone(&jst_offset).to_rfc3339()
}

/// Whole minutes elapsed between two Unix timestamps (milliseconds).
pub fn elapsed_minutes(since: i64, now: i64) -> i64 {
    (now - since).max(0) / 1000 / 60
}
