//! The import run: resolve the target calendar, then create every event.
//!
//! Calls are issued one at a time in input order. A failure to resolve the
//! calendar stops the run; a failure on one event is recorded and the run
//! moves on to the next.

use std::future::Future;

use calimport_core::{EventsFile, ValidatedConfig, ValidatedEvent};
use calimport_providers::{
    CalendarService, CreatedEvent, EventPayload, NewCalendar, ProviderResult,
};
use chrono_tz::Tz;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::error::{ClientResult, ImportError};

/// Exit status when the run completed but some events failed.
pub const EXIT_PARTIAL_FAILURE: u8 = 2;

/// The calendar events will be created in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCalendar {
    pub id: String,
    /// True if the calendar did not exist and was created by this run.
    pub created: bool,
}

/// What happened to one submitted event.
#[derive(Debug)]
pub struct EventOutcome {
    pub title: String,
    pub result: ClientResult<CreatedEvent>,
}

impl EventOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of a completed run, one outcome per event in input order.
#[derive(Debug)]
pub struct RunReport {
    pub calendar_id: String,
    pub calendar_created: bool,
    pub outcomes: Vec<EventOutcome>,
}

impl RunReport {
    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.created()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// One-line summary, e.g. `3 created, 1 failed`.
    pub fn summary(&self) -> String {
        format!("{} created, {} failed", self.created(), self.failed())
    }
}

/// What a [`run`] produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// `--dry-run`: the request bodies that would have been sent.
    Preview {
        calendar_name: String,
        timezone_name: String,
        payloads: Vec<EventPayload>,
    },
    Imported {
        calendar_name: String,
        report: RunReport,
    },
}

impl RunOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Imported { report, .. } if report.has_failures() => EXIT_PARTIAL_FAILURE,
            _ => 0,
        }
    }
}

/// Finds the first calendar whose display name is exactly `name`, creating
/// one in `time_zone` when there is none.
pub async fn resolve_calendar(
    service: &dyn CalendarService,
    name: &str,
    time_zone: &str,
) -> ProviderResult<ResolvedCalendar> {
    let calendars = service.list_calendars().await?;

    if let Some(existing) = calendars.into_iter().find(|c| c.summary == name) {
        debug!("using existing calendar '{}' ({})", name, existing.id);
        return Ok(ResolvedCalendar {
            id: existing.id,
            created: false,
        });
    }

    info!("calendar '{}' not found, creating it", name);
    let created = service
        .insert_calendar(&NewCalendar::new(name, time_zone))
        .await?;

    Ok(ResolvedCalendar {
        id: created.id,
        created: true,
    })
}

/// Builds the request body for one event.
pub fn build_payload(event: &ValidatedEvent, tz: &Tz, tz_name: &str) -> ClientResult<EventPayload> {
    EventPayload::from_event(event, tz, tz_name).ok_or_else(|| {
        ImportError::Unexpected(format!(
            "event '{}' has a time that cannot be placed in {}",
            event.title, tz_name
        ))
    })
}

/// Creates one event in `calendar_id`.
pub async fn create_event(
    service: &dyn CalendarService,
    calendar_id: &str,
    event: &ValidatedEvent,
    tz: &Tz,
    tz_name: &str,
) -> ClientResult<CreatedEvent> {
    let payload = build_payload(event, tz, tz_name)?;

    service
        .insert_event(calendar_id, &payload)
        .await
        .map_err(|source| ImportError::Event {
            title: event.title.clone(),
            source,
        })
}

/// Runs the import for a validated events file.
///
/// Returns an error only when the target calendar cannot be resolved; event
/// failures are reported in the [`RunReport`].
pub async fn run_import(
    service: &dyn CalendarService,
    config: &ValidatedConfig,
) -> ClientResult<RunReport> {
    let calendar =
        match resolve_calendar(service, &config.calendar_name, &config.timezone_name).await {
            Ok(calendar) => calendar,
            Err(e) => {
                error!("An error occurred: {}", e);
                error!("Failed to find or create the calendar.");
                return Err(ImportError::CalendarUnavailable(e));
            }
        };

    let mut outcomes = Vec::with_capacity(config.events.len());
    for event in &config.events {
        let result = create_event(
            service,
            &calendar.id,
            event,
            &config.timezone,
            &config.timezone_name,
        )
        .await;

        match &result {
            Ok(created) => info!(
                "Event created: {}",
                created.html_link.as_deref().unwrap_or(&created.id)
            ),
            Err(e) => error!("An error occurred: {}", e),
        }

        outcomes.push(EventOutcome {
            title: event.title.clone(),
            result,
        });
    }

    Ok(RunReport {
        calendar_id: calendar.id,
        calendar_created: calendar.created,
        outcomes,
    })
}

/// Loads and validates the events file, then previews or imports it.
///
/// `connect` is awaited only for a real import, after validation passed.
pub async fn run<S, F, Fut>(settings: &Settings, connect: F) -> ClientResult<RunOutcome>
where
    S: CalendarService,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ClientResult<S>>,
{
    let config = EventsFile::load(&settings.events_file)?.validate()?;
    debug!(
        "{} events for calendar '{}' in {}",
        config.events.len(),
        config.calendar_name,
        config.timezone_name
    );

    if settings.dry_run {
        let payloads = config
            .events
            .iter()
            .map(|event| build_payload(event, &config.timezone, &config.timezone_name))
            .collect::<ClientResult<Vec<_>>>()?;
        return Ok(RunOutcome::Preview {
            calendar_name: config.calendar_name,
            timezone_name: config.timezone_name,
            payloads,
        });
    }

    let service = connect().await?;
    let report = run_import(&service, &config).await?;
    Ok(RunOutcome::Imported {
        calendar_name: config.calendar_name,
        report,
    })
}
