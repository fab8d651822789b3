//! CalendarService trait and the request/response types it exchanges.
//!
//! The import pipeline only needs three provider operations: list the user's
//! calendars, create a calendar, and create an event. [`CalendarService`]
//! captures exactly those so the pipeline can run against the Google API
//! client or an in-memory fake.

use std::future::Future;
use std::pin::Pin;

use calimport_core::{ValidatedEvent, localize, to_zoned_timestamp};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The provider operations consumed by the import pipeline.
///
/// Every call is a single request/response round trip; callers await each
/// one before issuing the next.
pub trait CalendarService: Send + Sync {
    /// Lists every calendar visible to the user.
    fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarListEntry>>>;

    /// Creates a calendar and returns it with its assigned id.
    fn insert_calendar<'a>(
        &'a self,
        calendar: &'a NewCalendar,
    ) -> BoxFuture<'a, ProviderResult<CalendarListEntry>>;

    /// Creates an event in the given calendar.
    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a EventPayload,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>>;
}

/// A calendar from the calendar list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    /// The calendar ID.
    pub id: String,
    /// The calendar display name.
    #[serde(default)]
    pub summary: String,
    /// Whether this is the user's primary calendar.
    #[serde(default)]
    pub primary: bool,
    /// The calendar timezone.
    pub time_zone: Option<String>,
}

/// Request body for creating a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendar {
    pub summary: String,
    pub time_zone: String,
}

impl NewCalendar {
    pub fn new(summary: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            time_zone: time_zone.into(),
        }
    }
}

/// Request body for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub summary: String,
    /// Passed through verbatim; the provider renders HTML markup.
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<EventAttendee>>,
}

/// A zoned timestamp as the provider expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// RFC 3339 timestamp with numeric offset.
    pub date_time: String,
    /// IANA timezone name.
    pub time_zone: String,
}

/// An attendee, identified only by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventAttendee {
    pub email: String,
}

impl EventPayload {
    /// Builds the payload for a validated event in the run's timezone.
    ///
    /// Returns `None` only if a wall-clock time cannot be placed in `tz`.
    pub fn from_event(event: &ValidatedEvent, tz: &Tz, tz_name: &str) -> Option<Self> {
        let start = localize(event.start, tz)?;
        let end = localize(event.end, tz)?;

        Some(Self {
            summary: event.title.clone(),
            description: event.description.clone(),
            start: EventDateTime {
                date_time: to_zoned_timestamp(&start),
                time_zone: tz_name.to_string(),
            },
            end: EventDateTime {
                date_time: to_zoned_timestamp(&end),
                time_zone: tz_name.to_string(),
            },
            attendees: event.attendees.as_ref().map(|emails| {
                emails
                    .iter()
                    .map(|email| EventAttendee {
                        email: email.clone(),
                    })
                    .collect()
            }),
        })
    }
}

/// The provider's view of a freshly created event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    #[serde(default)]
    pub id: String,
    /// Link to the event in the provider's web UI.
    pub html_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use calimport_core::parse_wall_clock;
    use serde_json::json;

    fn standup(attendees: Option<Vec<String>>) -> ValidatedEvent {
        ValidatedEvent {
            title: "Standup".to_string(),
            description: "daily".to_string(),
            start: parse_wall_clock("2024/01/10 09:00 AM").unwrap(),
            end: parse_wall_clock("2024/01/10 09:15 AM").unwrap(),
            attendees,
        }
    }

    #[test]
    fn payload_for_chicago_event() {
        let payload =
            EventPayload::from_event(&standup(None), &chrono_tz::America::Chicago, "America/Chicago")
                .unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "summary": "Standup",
                "description": "daily",
                "start": {
                    "dateTime": "2024-01-10T09:00:00-06:00",
                    "timeZone": "America/Chicago"
                },
                "end": {
                    "dateTime": "2024-01-10T09:15:00-06:00",
                    "timeZone": "America/Chicago"
                }
            })
        );
    }

    #[test]
    fn attendees_map_to_email_objects() {
        let event = standup(Some(vec![
            "alice@example.com".to_string(),
            "bob@example.com".to_string(),
        ]));
        let payload =
            EventPayload::from_event(&event, &chrono_tz::Europe::Paris, "Europe/Paris").unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value["attendees"],
            json!([{ "email": "alice@example.com" }, { "email": "bob@example.com" }])
        );
        assert_eq!(value["start"]["dateTime"], "2024-01-10T09:00:00+01:00");
    }

    #[test]
    fn empty_attendee_list_is_sent() {
        let payload = EventPayload::from_event(
            &standup(Some(vec![])),
            &chrono_tz::America::Chicago,
            "America/Chicago",
        )
        .unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["attendees"], json!([]));
    }

    #[test]
    fn description_markup_is_untouched() {
        let mut event = standup(None);
        event.description = "<b>Agenda</b><br><a href=\"https://x.test\">doc</a>".to_string();
        let payload =
            EventPayload::from_event(&event, &chrono_tz::UTC, "UTC").unwrap();
        assert_eq!(payload.description, event.description);
    }

    #[test]
    fn new_calendar_serializes_camel_case() {
        let body = NewCalendar::new("Team", "America/Chicago");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "summary": "Team", "timeZone": "America/Chicago" })
        );
    }

    #[test]
    fn parse_calendar_list_entry() {
        let entry: CalendarListEntry = serde_json::from_value(json!({
            "kind": "calendar#calendarListEntry",
            "id": "abc123@group.calendar.google.com",
            "summary": "Team",
            "timeZone": "America/Chicago",
            "accessRole": "owner"
        }))
        .unwrap();
        assert_eq!(entry.id, "abc123@group.calendar.google.com");
        assert_eq!(entry.summary, "Team");
        assert!(!entry.primary);
        assert_eq!(entry.time_zone.as_deref(), Some("America/Chicago"));
    }

    #[test]
    fn parse_created_event() {
        let created: CreatedEvent = serde_json::from_value(json!({
            "id": "evt1",
            "htmlLink": "https://www.google.com/calendar/event?eid=abc",
            "status": "confirmed"
        }))
        .unwrap();
        assert_eq!(
            created.html_link.as_deref(),
            Some("https://www.google.com/calendar/event?eid=abc")
        );
    }
}
