// --- File: crates/medibook_common/src/models.rs ---

// Data structures shared between the calendar gateway, the booking logic and
// the backend service.

use chrono::{DateTime, FixedOffset, ParseError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// ISO 8601 shapes accepted besides full RFC 3339.
const EXTRA_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Parses an ISO 8601 timestamp with an offset.
///
/// RFC 3339 is tried first (a trailing `Z` is read as `+00:00`); minute
/// precision and a space separator are also accepted. Timestamps without an
/// offset are rejected.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value).or_else(|err| {
        EXTRA_TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(value, format).ok())
            .ok_or(err)
    })
}

/// A proposed or existing time window.
///
/// Both ends keep the offset the caller supplied; weekday and time-of-day rules
/// are evaluated in that offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Parses both ends of a range. `end > start` is not checked here.
    pub fn parse(start: &str, end: &str) -> Result<Self, ParseError> {
        Ok(Self {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end.signed_duration_since(self.start)
    }
}

/// Start or end of a provider event (`start.dateTime`, `start.timeZone`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventDateTime {
    #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// All-day events carry a date instead of a dateTime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// An event as returned by the calendar provider.
///
/// Only the fields the booking logic looks at are typed; everything else the
/// provider sends is kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub extra: Map<String, Value>,
}

/// Everything needed to create a calendar entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarEvent {
    pub range: TimeRange,
    pub summary: String,
    /// IANA time zone name written to `start.timeZone` and `end.timeZone`.
    pub time_zone: String,
}

/// Result of a notification operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Transport-level id of the message, when the transport reports one.
    pub id: Option<String>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_accepts_zulu_and_offsets() {
        let range = TimeRange::parse("2025-05-12T07:00:00Z", "2025-05-12T10:10:00+03:00")
            .expect("valid timestamps");
        assert_eq!(range.duration(), Duration::minutes(10));
        assert_eq!(range.end.offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn test_parse_accepts_minute_precision_and_space_separator() {
        let full = parse_timestamp("2025-05-12T10:00:00+03:00").unwrap();
        assert_eq!(parse_timestamp("2025-05-12T10:00+03:00").unwrap(), full);
        assert_eq!(parse_timestamp("2025-05-12 10:00+03:00").unwrap(), full);
        assert_eq!(parse_timestamp("2025-05-12 10:00:00+03:00").unwrap(), full);
        assert_eq!(
            parse_timestamp("2025-05-12 10:00:00.250+03:00").unwrap(),
            full + Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_parse_rejects_naive_and_garbage() {
        assert!(TimeRange::parse("2025-05-12T10:00:00", "2025-05-12T10:10:00+03:00").is_err());
        assert!(TimeRange::parse("2025-05-12T10:00:00Z", "tomorrow").is_err());
    }

    #[test]
    fn test_calendar_event_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "id": "evt1",
            "summary": "Checkup",
            "status": "confirmed",
            "start": { "dateTime": "2025-05-12T10:00:00+03:00", "timeZone": "Asia/Jerusalem" },
            "end": { "dateTime": "2025-05-12T10:10:00+03:00", "timeZone": "Asia/Jerusalem" }
        });

        let event: CalendarEvent = serde_json::from_value(raw.clone()).expect("event parses");
        assert_eq!(event.id.as_deref(), Some("evt1"));
        assert_eq!(event.extra.get("status"), Some(&Value::String("confirmed".into())));
        assert_eq!(serde_json::to_value(&event).expect("serializes"), raw);
    }
}
