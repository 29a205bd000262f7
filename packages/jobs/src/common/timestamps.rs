//! Parsing for the `created` timestamps Adzuna attaches to postings.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatedError {
    #[error("posting has no created timestamp")]
    Missing,

    #[error("unparseable created timestamp {0:?}")]
    Invalid(String),
}

/// Parse an ISO-8601 `created` value into UTC.
///
/// A trailing `Z` is normalised to `+00:00` before RFC 3339 parsing.
/// Timestamps without any offset are read as UTC.
pub fn parse_created(raw: Option<&str>) -> Result<DateTime<Utc>, CreatedError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(CreatedError::Missing)?;

    let normalised = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stem) => format!("{}+00:00", stem),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| CreatedError::Invalid(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zulu_suffix_is_utc() {
        let parsed = parse_created(Some("2025-03-04T10:11:12Z")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 4, 10, 11, 12).unwrap());
    }

    #[test]
    fn explicit_offset_converted_to_utc() {
        let parsed = parse_created(Some("2025-03-04T12:11:12+02:00")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 4, 10, 11, 12).unwrap());
    }

    #[test]
    fn offsetless_timestamp_read_as_utc() {
        let parsed = parse_created(Some("2025-03-04T10:11:12.250")).unwrap();
        assert_eq!(parsed.timestamp(), Utc.with_ymd_and_hms(2025, 3, 4, 10, 11, 12).unwrap().timestamp());
    }

    #[test]
    fn missing_and_blank_are_missing() {
        assert_eq!(parse_created(None), Err(CreatedError::Missing));
        assert_eq!(parse_created(Some("  ")), Err(CreatedError::Missing));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(
            parse_created(Some("last tuesday")),
            Err(CreatedError::Invalid("last tuesday".to_string()))
        );
    }
}
