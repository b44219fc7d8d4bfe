use anyhow::{bail, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use shared::CalendarEvent;

/// A calendar event with its timestamps parsed into real instants.
///
/// The persisted shape keeps timestamps as strings; everything that computes
/// with event times (sorting, reminder planning) goes through this model so
/// parsing happens in exactly one place.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub remind_minutes: Option<i64>,
    pub notes: String,
}

impl ParsedEvent {
    /// Parse a persisted event, rejecting invalid timestamps
    pub fn from_dto(event: &CalendarEvent) -> Result<Self> {
        let start = parse_instant(&event.start_iso)?;
        let end = match &event.end_iso {
            Some(raw) if !raw.trim().is_empty() => Some(parse_instant(raw)?),
            _ => None,
        };
        Ok(Self {
            id: event.id.clone(),
            category_id: event.category_id.clone(),
            title: event.title.clone(),
            start,
            end,
            remind_minutes: event.remind_minutes,
            notes: event.notes.clone(),
        })
    }
}

/// Parse an ISO-8601 instant.
///
/// RFC 3339 first; a naive `YYYY-MM-DDTHH:MM[:SS]` timestamp (what
/// datetime-local form inputs produce) is taken as local time.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            let resolved = match Local.from_local_datetime(&naive) {
                LocalResult::Single(instant) => Some(instant),
                // A DST fold makes the local time ambiguous; take the earlier reading
                LocalResult::Ambiguous(earlier, _) => Some(earlier),
                LocalResult::None => None,
            };
            if let Some(instant) = resolved {
                return Ok(instant.with_timezone(&Utc));
            }
        }
    }

    bail!("'{}' is not a valid ISO-8601 instant", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_instants() {
        let instant = parse_instant("2026-03-01T09:00:00Z").unwrap();
        assert_eq!(instant.to_rfc3339(), "2026-03-01T09:00:00+00:00");

        let offset = parse_instant("2026-03-01T09:00:00-05:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2026-03-01T14:00:00+00:00");
    }

    #[test]
    fn parses_naive_datetime_local_inputs() {
        assert!(parse_instant("2026-03-01T09:00").is_ok());
        assert!(parse_instant("2026-03-01T09:00:30").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("not a date").is_err());
        assert!(parse_instant("2026-03-01").is_err());
        assert!(parse_instant("").is_err());
    }

    #[test]
    fn from_dto_rejects_bad_end_but_allows_blank() {
        let mut event = CalendarEvent {
            id: "event::1".to_string(),
            category_id: "category::1".to_string(),
            title: "Inspection".to_string(),
            start_iso: "2026-03-01T09:00:00Z".to_string(),
            end_iso: Some("  ".to_string()),
            remind_minutes: Some(30),
            notes: String::new(),
        };
        assert_eq!(ParsedEvent::from_dto(&event).unwrap().end, None);

        event.end_iso = Some("bogus".to_string());
        assert!(ParsedEvent::from_dto(&event).is_err());
    }
}
