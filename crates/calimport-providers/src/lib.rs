//! Calendar provider access for the importer.
//!
//! - [`CalendarService`] - The three provider operations the import needs
//! - [`EventPayload`] - An event as sent to the provider
//! - [`ProviderError`] - Error types for provider operations
//! - [`google`] - The Google Calendar implementation (feature `google`)

pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod service;

// Re-export main types at crate root
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use service::{
    BoxFuture, CalendarListEntry, CalendarService, CreatedEvent, EventAttendee, EventDateTime,
    EventPayload, NewCalendar,
};
