//! Lenient date handling for payload fields such as `ngayBu` / `ngayNghi`.
//!
//! The backend posts plain dates (`2024-10-20`), naive date-times
//! (`2024-10-20T07:30:00`) or RFC 3339 strings depending on the caller.
//! All of them are accepted and normalised to a [`NaiveDateTime`]; the wire
//! form on the way out is always `YYYY-MM-DDTHH:MM:SS`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Format used when a date is written back to clients.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used inside human-readable notification messages.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Parse any of the accepted date spellings.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(WIRE_FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid date `{raw}`, expected YYYY-MM-DD or an ISO 8601 date-time"
        ))
    })
}
