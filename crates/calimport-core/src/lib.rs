//! Core types: events file, validation, wall-clock parsing, tracing

pub mod error;
pub mod events;
pub mod time;
pub mod tracing;

pub use error::{ConfigError, ConfigResult};
pub use events::{
    EventSpec, EventsFile, ValidatedConfig, ValidatedEvent, DEFAULT_CALENDAR_NAME,
    DEFAULT_EVENTS_FILE, DEFAULT_TIMEZONE,
};
pub use time::{localize, parse_timezone, parse_wall_clock, to_zoned_timestamp, WALL_CLOCK_FORMAT};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
