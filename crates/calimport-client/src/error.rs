//! Client error types.

use calimport_core::ConfigError;
use calimport_providers::ProviderError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ImportError>;

/// Errors that can stop an import or fail a single event.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The events file is missing, unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The settings file could not be read or parsed.
    #[error("settings error: {0}")]
    Settings(String),

    /// No usable credential could be obtained.
    #[error("authentication failed: {0}")]
    Auth(#[source] ProviderError),

    /// The target calendar could neither be found nor created.
    #[error("Failed to find or create the calendar.")]
    CalendarUnavailable(#[source] ProviderError),

    /// The provider rejected one event.
    #[error("failed to create event '{title}': {source}")]
    Event {
        title: String,
        #[source]
        source: ProviderError,
    },

    /// Anything else.
    #[error("{0}")]
    Unexpected(String),
}

impl ImportError {
    /// Returns true when the error has already been logged where it occurred.
    pub fn is_logged(&self) -> bool {
        matches!(self, Self::CalendarUnavailable(_) | Self::Event { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_errors_keep_their_message() {
        let err = ImportError::from(ConfigError::Schema(
            "Missing or invalid 'events' list in YAML file.".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Missing or invalid 'events' list in YAML file."
        );
    }

    #[test]
    fn event_error_names_the_title() {
        let err = ImportError::Event {
            title: "Standup".to_string(),
            source: ProviderError::from_response(400, "Invalid attendee email."),
        };
        let message = err.to_string();
        assert!(message.contains("'Standup'"));
        assert!(message.contains("Invalid attendee email."));
        assert!(err.source().is_some());
        assert!(err.is_logged());
    }

    #[test]
    fn auth_error_is_not_prelogged() {
        let err = ImportError::Auth(ProviderError::authentication("OAuth callback timeout"));
        assert!(!err.is_logged());
        assert!(err.to_string().starts_with("authentication failed"));
    }
}
