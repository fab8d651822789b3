//! The events file: a YAML document listing the events to create.
//!
//! ```yaml
//! calendar_name: Team
//! timezone: America/Chicago
//! events:
//!   - title: Standup
//!     description: "<b>daily</b> sync"
//!     event start time: 2024/01/10 09:00 AM
//!     event end time: 2024/01/10 09:15 AM
//!     attendees:
//!       - alice@example.com
//! ```
//!
//! Loading ([`EventsFile::load`]) only checks that the document is YAML of
//! roughly the right shape. [`EventsFile::validate`] performs the required
//! field and date checks and yields a [`ValidatedConfig`].

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::time::{parse_timezone, parse_wall_clock};

/// Default path of the events file.
pub const DEFAULT_EVENTS_FILE: &str = "./events.yaml";

/// Calendar used when `calendar_name` is absent.
pub const DEFAULT_CALENDAR_NAME: &str = "Work";

/// Timezone used when `timezone` is absent.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Field names, in the order they are reported when missing.
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_START: &str = "event start time";
pub const FIELD_END: &str = "event end time";

/// The events file as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventsFile {
    /// Display name of the target calendar.
    #[serde(deserialize_with = "scalar_string")]
    pub calendar_name: Option<String>,
    /// IANA timezone the event times are expressed in.
    #[serde(deserialize_with = "scalar_string")]
    pub timezone: Option<String>,
    /// Raw `events` value; must turn out to be a sequence of mappings.
    pub events: Option<Value>,
}

/// A single event entry before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventSpec {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(rename = "event start time", deserialize_with = "scalar_string")]
    pub start_time: Option<String>,
    #[serde(rename = "event end time", deserialize_with = "scalar_string")]
    pub end_time: Option<String>,
    pub attendees: Option<Vec<String>>,
}

/// Reads a text field, taking numbers and booleans as their YAML spelling
/// (`title: 2024` is the title "2024"). `null` counts as absent.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(serde::de::Error::custom("expected a string")),
    }
}

/// An event whose required fields are present and whose times parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// `None` when the entry had no `attendees` key.
    pub attendees: Option<Vec<String>>,
}

/// The whole events file after validation.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub calendar_name: String,
    pub timezone: Tz,
    /// The timezone exactly as written (or the default).
    pub timezone_name: String,
    pub events: Vec<ValidatedEvent>,
}

impl EventsFile {
    /// Reads and parses the events file at `path`.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: PathBuf::from(path),
            source,
        })?;

        debug!("loaded events file {:?} ({} bytes)", path, content.len());
        Self::from_yaml(&content)
    }

    /// Parses an events document from a YAML string.
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: Value = serde_yaml::from_str(content)?;
        match document {
            Value::Null => Ok(Self::default()),
            Value::Mapping(_) => Ok(serde_yaml::from_value(document)?),
            _ => Err(ConfigError::Schema(
                "YAML file must contain a mapping at the top level.".to_string(),
            )),
        }
    }

    /// The calendar name, or [`DEFAULT_CALENDAR_NAME`].
    pub fn calendar_name(&self) -> &str {
        self.calendar_name.as_deref().unwrap_or(DEFAULT_CALENDAR_NAME)
    }

    /// The timezone name, or [`DEFAULT_TIMEZONE`].
    pub fn timezone_name(&self) -> &str {
        self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
    }

    /// Checks the whole document.
    ///
    /// Stops at the first failing event; on success every event is returned
    /// in file order.
    pub fn validate(&self) -> ConfigResult<ValidatedConfig> {
        let entries = match &self.events {
            Some(Value::Sequence(entries)) => entries,
            _ => {
                return Err(ConfigError::Schema(
                    "Missing or invalid 'events' list in YAML file.".to_string(),
                ));
            }
        };

        let timezone_name = self.timezone_name().to_string();
        let timezone = parse_timezone(&timezone_name)
            .ok_or_else(|| ConfigError::InvalidTimezone(timezone_name.clone()))?;

        let events = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| EventSpec::from_entry(index, entry)?.validate(index))
            .collect::<ConfigResult<Vec<_>>>()?;

        debug!(
            "validated {} events for calendar '{}' in {}",
            events.len(),
            self.calendar_name(),
            timezone_name
        );

        Ok(ValidatedConfig {
            calendar_name: self.calendar_name().to_string(),
            timezone,
            timezone_name,
            events,
        })
    }
}

impl EventSpec {
    fn from_entry(index: usize, entry: &Value) -> ConfigResult<Self> {
        if !entry.is_mapping() {
            return Err(ConfigError::Schema(format!(
                "Event #{} in 'events' is not a mapping.",
                index + 1
            )));
        }
        serde_yaml::from_value(entry.clone())
            .map_err(|e| ConfigError::Schema(format!("Event #{} is malformed: {}", index + 1, e)))
    }

    /// Names of the required fields this entry lacks.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (FIELD_TITLE, self.title.is_none()),
            (FIELD_DESCRIPTION, self.description.is_none()),
            (FIELD_START, self.start_time.is_none()),
            (FIELD_END, self.end_time.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
    }

    /// Checks required fields and parses both times.
    pub fn validate(&self, index: usize) -> ConfigResult<ValidatedEvent> {
        let (Some(title), Some(description), Some(start), Some(end)) = (
            &self.title,
            &self.description,
            &self.start_time,
            &self.end_time,
        ) else {
            return Err(ConfigError::MissingFields {
                index,
                fields: self.missing_fields(),
            });
        };

        let start = parse_wall_clock(start).map_err(|_| ConfigError::Format {
            field: FIELD_START,
            title: title.clone(),
        })?;
        let end = parse_wall_clock(end).map_err(|_| ConfigError::Format {
            field: FIELD_END,
            title: title.clone(),
        })?;

        Ok(ValidatedEvent {
            title: title.clone(),
            description: description.clone(),
            start,
            end,
            attendees: self.attendees.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEAM_FILE: &str = r#"
calendar_name: Team
timezone: America/Chicago
events:
  - title: Standup
    description: daily
    event start time: 2024/01/10 09:00 AM
    event end time: 2024/01/10 09:15 AM
  - title: Review
    description: "<b>quarterly</b> review"
    event start time: 2024/01/11 02:00 PM
    event end time: 2024/01/11 03:00 PM
    attendees:
      - alice@example.com
      - bob@example.com
"#;

    fn validate(yaml: &str) -> ConfigResult<ValidatedConfig> {
        EventsFile::from_yaml(yaml)?.validate()
    }

    mod loading {
        use super::*;

        #[test]
        fn missing_file_is_not_found() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("events.yaml");
            let err = EventsFile::load(&path).unwrap_err();
            assert!(matches!(err, ConfigError::NotFound(p) if p == path));
        }

        #[test]
        fn loads_from_disk() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(TEAM_FILE.as_bytes()).unwrap();
            let events = EventsFile::load(file.path()).unwrap();
            assert_eq!(events.calendar_name(), "Team");
            assert_eq!(events.timezone_name(), "America/Chicago");
        }

        #[test]
        fn invalid_yaml_is_parse_error() {
            let err = EventsFile::from_yaml("events: [unclosed").unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
        }

        #[test]
        fn scalar_document_is_schema_error() {
            let err = EventsFile::from_yaml("just a string").unwrap_err();
            assert!(matches!(err, ConfigError::Schema(_)));
        }

        #[test]
        fn empty_document_has_no_events() {
            let err = validate("").unwrap_err();
            assert!(err.to_string().contains("'events'"));
        }
    }

    mod top_level {
        use super::*;

        #[test]
        fn full_file_validates() {
            let config = validate(TEAM_FILE).unwrap();
            assert_eq!(config.calendar_name, "Team");
            assert_eq!(config.timezone, chrono_tz::America::Chicago);
            assert_eq!(config.timezone_name, "America/Chicago");
            assert_eq!(config.events.len(), 2);
            assert_eq!(config.events[0].title, "Standup");
            assert_eq!(config.events[1].description, "<b>quarterly</b> review");
        }

        #[test]
        fn defaults_apply_when_keys_are_absent() {
            let config = validate(
                "events:\n  - title: a\n    description: b\n    event start time: 2024/01/10 09:00 AM\n    event end time: 2024/01/10 10:00 AM\n",
            )
            .unwrap();
            assert_eq!(config.calendar_name, DEFAULT_CALENDAR_NAME);
            assert_eq!(config.timezone_name, DEFAULT_TIMEZONE);
            assert_eq!(config.timezone, chrono_tz::America::New_York);
        }

        #[test]
        fn null_keys_fall_back_to_defaults() {
            let config = validate("calendar_name: ~\ntimezone: ~\nevents: []\n").unwrap();
            assert_eq!(config.calendar_name, "Work");
            assert_eq!(config.timezone_name, "America/New_York");
            assert!(config.events.is_empty());
        }

        #[test]
        fn numeric_calendar_name_is_text() {
            let config = validate("calendar_name: 2024\nevents: []\n").unwrap();
            assert_eq!(config.calendar_name, "2024");
        }

        #[test]
        fn missing_events_is_schema_error() {
            let err = validate("calendar_name: Team\n").unwrap_err();
            assert!(matches!(err, ConfigError::Schema(ref m) if m.contains("'events'")));
        }

        #[test]
        fn non_list_events_is_schema_error() {
            let err = validate("events:\n  title: Standup\n").unwrap_err();
            assert!(matches!(err, ConfigError::Schema(_)));
        }

        #[test]
        fn unknown_timezone_is_rejected() {
            let err = validate("timezone: Nowhere/Special\nevents: []\n").unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimezone(ref tz) if tz == "Nowhere/Special"));
        }

        #[test]
        fn non_mapping_event_is_schema_error() {
            let err = validate("events:\n  - just text\n").unwrap_err();
            assert!(matches!(err, ConfigError::Schema(ref m) if m.contains("#1")));
        }
    }

    mod per_event {
        use super::*;

        #[test]
        fn reports_every_missing_field() {
            let err = validate("events:\n  - description: only this\n").unwrap_err();
            match err {
                ConfigError::MissingFields { index, fields } => {
                    assert_eq!(index, 0);
                    assert_eq!(fields, vec![FIELD_TITLE, FIELD_START, FIELD_END]);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn empty_mapping_misses_all_four() {
            let err = validate("events:\n  - {}\n").unwrap_err();
            match err {
                ConfigError::MissingFields { fields, .. } => assert_eq!(fields.len(), 4),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn later_event_failure_aborts_whole_file() {
            let yaml = format!("{TEAM_FILE}  - title: Broken\n");
            let err = validate(&yaml).unwrap_err();
            assert!(matches!(err, ConfigError::MissingFields { index: 2, .. }));
        }

        #[test]
        fn bad_start_time_names_field_and_title() {
            let err = validate(
                "events:\n  - title: Launch\n    description: x\n    event start time: 2024-01-10 09:00\n    event end time: 2024/01/10 10:00 AM\n",
            )
            .unwrap_err();
            match err {
                ConfigError::Format { field, title } => {
                    assert_eq!(field, FIELD_START);
                    assert_eq!(title, "Launch");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn bad_end_time_names_end_field() {
            let err = validate(
                "events:\n  - title: Launch\n    description: x\n    event start time: 2024/01/10 09:00 AM\n    event end time: tomorrow\n",
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::Format { field: FIELD_END, .. }));
        }

        #[test]
        fn end_before_start_is_accepted() {
            let config = validate(
                "events:\n  - title: Backwards\n    description: x\n    event start time: 2024/01/10 10:00 AM\n    event end time: 2024/01/10 09:00 AM\n",
            )
            .unwrap();
            assert!(config.events[0].end < config.events[0].start);
        }

        #[test]
        fn attendees_are_optional() {
            let config = validate(TEAM_FILE).unwrap();
            assert_eq!(config.events[0].attendees, None);
            assert_eq!(
                config.events[1].attendees,
                Some(vec![
                    "alice@example.com".to_string(),
                    "bob@example.com".to_string()
                ])
            );
        }

        #[test]
        fn empty_attendee_list_is_kept() {
            let config = validate(
                "events:\n  - title: a\n    description: b\n    event start time: 2024/01/10 09:00 AM\n    event end time: 2024/01/10 10:00 AM\n    attendees: []\n",
            )
            .unwrap();
            assert_eq!(config.events[0].attendees, Some(vec![]));
        }

        #[test]
        fn multiline_description_is_verbatim() {
            let config = validate(
                "events:\n  - title: a\n    description: |\n      <p>line one</p>\n      <p>line two</p>\n    event start time: 2024/01/10 09:00 AM\n    event end time: 2024/01/10 10:00 AM\n",
            )
            .unwrap();
            assert_eq!(
                config.events[0].description,
                "<p>line one</p>\n<p>line two</p>\n"
            );
        }

        #[test]
        fn scalar_fields_are_read_as_text() {
            let config = validate(
                "events:\n  - title: 2024\n    description: 42\n    event start time: 2024/01/10 09:00 AM\n    event end time: 2024/01/10 10:00 AM\n  - title: true\n    description: 1.5\n    event start time: 2024/01/11 09:00 AM\n    event end time: 2024/01/11 10:00 AM\n",
            )
            .unwrap();
            assert_eq!(config.events[0].title, "2024");
            assert_eq!(config.events[0].description, "42");
            assert_eq!(config.events[1].title, "true");
            assert_eq!(config.events[1].description, "1.5");
        }

        #[test]
        fn null_title_counts_as_missing() {
            let err = validate(
                "events:\n  - title: ~\n    description: d\n    event start time: 2024/01/10 09:00 AM\n    event end time: 2024/01/10 10:00 AM\n",
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::MissingFields { .. }));
        }

        #[test]
        fn list_title_is_schema_error() {
            let err = validate(
                "events:\n  - title: [a, b]\n    description: d\n    event start time: 2024/01/10 09:00 AM\n    event end time: 2024/01/10 10:00 AM\n",
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::Schema(ref m) if m.contains("#1")));
        }
    }
}
