//! Errors raised while loading and validating an events file.

use std::path::PathBuf;

use thiserror::Error;

use crate::time::WALL_CLOCK_FORMAT;

/// Result type for events file operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// An error in the events file.
///
/// Every variant is fatal for the run: nothing is sent to the calendar
/// provider once one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The events file does not exist.
    #[error("YAML file {} does not exist.", .0.display())]
    NotFound(PathBuf),

    /// The events file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a YAML document of the expected shape.
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A required top-level key is missing or has the wrong type.
    #[error("{0}")]
    Schema(String),

    /// An event lacks one or more required fields.
    #[error("Event is missing the following required fields: {}", fields.join(", "))]
    MissingFields {
        /// Zero-based position of the event in the `events` list.
        index: usize,
        /// Every missing field, in declaration order.
        fields: Vec<&'static str>,
    },

    /// A start or end time does not follow the wall-clock format.
    #[error("Invalid format for '{field}' in event '{title}'. Expected format is '{expected}'.", expected = WALL_CLOCK_FORMAT)]
    Format {
        /// The offending field name.
        field: &'static str,
        /// Title of the event carrying the bad value.
        title: String,
    },

    /// The `timezone` value is not an IANA timezone name.
    #[error("Unknown timezone '{0}'. Expected an IANA name such as 'America/New_York'.")]
    InvalidTimezone(String),
}

impl ConfigError {
    /// Returns true for errors about the file's content rather than its
    /// availability.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Schema(_)
                | Self::MissingFields { .. }
                | Self::Format { .. }
                | Self::InvalidTimezone(_)
        )
    }
}
