use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Get current Unix timestamp (milliseconds).
///
/// A Unix timestamp does not depend on the zone; the name records that every
/// rendering of it in this workspace happens in JST.
pub fn get_jst_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a Unix timestamp (milliseconds) as RFC 3339 in JST (UTC+9).
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_millis).unwrap_or_default();
    match FixedOffset::east_opt(JST_OFFSET_SECS) {
        Some(jst) => utc.with_timezone(&jst).to_rfc3339(),
        None => utc.to_rfc3339(),
    }
}
