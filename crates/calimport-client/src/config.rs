//! Client configuration.
//!
//! Optional settings live in `~/.config/calimport/config.toml`. Command-line
//! flags win over the file, and the file wins over built-in defaults.
//!
//! ```toml
//! events_file = "~/team/events.yaml"
//! credentials_file = "~/.config/calimport/credentials.json"
//! token_path = "~/.config/calimport/token.json"
//! timeout_secs = 60
//! loopback_port = 8085
//! log_format = "json"
//! debug = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use calimport_core::{DEFAULT_EVENTS_FILE, TracingOutputFormat};
use calimport_providers::google::GoogleConfig;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{ClientResult, ImportError};

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path to the YAML events file.
    pub events_file: Option<PathBuf>,

    /// Path to the OAuth client secrets file.
    pub credentials_file: Option<PathBuf>,

    /// Path to the token cache.
    pub token_path: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Port for the OAuth loopback listener (0 picks a free one).
    pub loopback_port: Option<u16>,

    /// Log output format.
    pub log_format: Option<TracingOutputFormat>,

    /// Debug mode.
    pub debug: bool,
}

impl ClientConfig {
    /// Loads configuration from the default path, if the file exists.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImportError::Settings(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ImportError::Settings(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calimport")
    }
}

/// The effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub events_file: PathBuf,
    pub credentials_file: PathBuf,
    pub token_path: PathBuf,
    pub timeout: Duration,
    pub loopback_port: u16,
    pub log_format: TracingOutputFormat,
    pub debug: bool,
    pub dry_run: bool,
}

impl Settings {
    /// Merges command-line flags, the settings file and defaults.
    pub fn resolve(cli: &Cli, file: &ClientConfig) -> Self {
        let pick = |flag: &Option<PathBuf>, from_file: &Option<PathBuf>, default: &str| {
            flag.clone()
                .or_else(|| from_file.as_deref().map(expand_home))
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            events_file: pick(&cli.events, &file.events_file, DEFAULT_EVENTS_FILE),
            credentials_file: pick(
                &cli.credentials,
                &file.credentials_file,
                GoogleConfig::DEFAULT_CREDENTIALS_PATH,
            ),
            token_path: pick(&cli.token, &file.token_path, GoogleConfig::DEFAULT_TOKEN_PATH),
            timeout: Duration::from_secs(
                cli.timeout
                    .or(file.timeout_secs)
                    .unwrap_or(GoogleConfig::DEFAULT_TIMEOUT_SECS),
            ),
            loopback_port: file.loopback_port.unwrap_or(0),
            log_format: cli.log_format.or(file.log_format).unwrap_or_default(),
            debug: cli.debug || file.debug,
            dry_run: cli.dry_run,
        }
    }

    /// Builds the Google provider configuration. The client secrets file is
    /// not read here.
    pub fn google_config(&self) -> GoogleConfig {
        GoogleConfig::new(&self.credentials_file)
            .with_token_path(&self.token_path)
            .with_timeout(self.timeout)
            .with_loopback_port(self.loopback_port)
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
