//! Lenient parsing of the backend's creation timestamps.
//!
//! The backend renders timestamps with Python's `isoformat()`, which omits
//! the offset for naive values. Naive timestamps are taken as UTC.

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Parse an ISO-8601 / RFC 3339 timestamp, with or without offset.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // `2025-01-15 10:30:00` as printed by Postgres.
    let raw = raw.replacen(' ', "T", 1);

    OffsetDateTime::parse(&raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(&raw, &Iso8601::DEFAULT))
        .or_else(|_| {
            PrimitiveDateTime::parse(&raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc)
        })
        .ok()
}

/// Like [`parse_timestamp`], but missing or unparsable values order as the
/// Unix epoch.
pub fn parse_or_epoch(raw: Option<&str>) -> OffsetDateTime {
    raw.and_then(parse_timestamp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Render a backend timestamp as `dd.mm.yyyy hh:mm` in UTC.
///
/// Missing values render as `-`; unparsable ones are shown as received.
pub fn display_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "-".to_owned();
    };
    match parse_timestamp(raw) {
        Some(ts) => {
            let ts = ts.to_offset(UtcOffset::UTC);
            format!(
                "{:02}.{:02}.{} {:02}:{:02}",
                ts.day(),
                u8::from(ts.month()),
                ts.year(),
                ts.hour(),
                ts.minute()
            )
        }
        None => raw.to_owned(),
    }
}
