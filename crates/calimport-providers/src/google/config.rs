//! Google Calendar provider configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// OAuth 2.0 client credentials for Google API access.
///
/// These identify the application, not the user, and come from the
/// `credentials.json` file downloaded from the Google Cloud Console.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
}

/// Structure of Google's OAuth client secrets JSON file.
///
/// Supports the Cloud Console layout (an "installed" or "web" section) and a
/// flat layout with client_id and client_secret at the root.
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<NestedCredentials>,
    web: Option<NestedCredentials>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NestedCredentials {
    client_id: String,
    client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Loads OAuth credentials from a client secrets JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProviderError::configuration(format!(
                "client secrets file {} does not exist; download it from the Google Cloud Console",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!("failed to read {}", path.display()))
                .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses OAuth credentials from a client secrets JSON string.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let file: ClientSecretsFile = serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration("failed to parse client secrets JSON").with_source(e)
        })?;

        if let Some(creds) = file.installed.or(file.web) {
            return Ok(Self::new(creds.client_id, creds.client_secret));
        }

        if let (Some(client_id), Some(client_secret)) = (file.client_id, file.client_secret) {
            return Ok(Self::new(client_id, client_secret));
        }

        Err(ProviderError::configuration(
            "client secrets must contain an 'installed'/'web' section or 'client_id'/'client_secret' at root level",
        ))
    }

    /// Checks that both values are present.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        Ok(())
    }
}

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Path of the client secrets file, read only when the browser flow runs.
    pub credentials_path: PathBuf,

    /// Client credentials supplied directly instead of through a file.
    pub credentials: Option<OAuthCredentials>,

    /// Path of the token cache. Defaults to `token.json`.
    pub token_path: PathBuf,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,

    /// Port for the loopback OAuth server; 0 lets the OS pick one.
    pub loopback_port: u16,

    /// OAuth scopes to request.
    pub scopes: Vec<String>,

    /// Calendar API base URL.
    pub api_base: String,

    /// OAuth authorization endpoint.
    pub auth_url: String,

    /// OAuth token endpoint, used when the cached token does not name one.
    pub token_url: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Read/write access to the user's calendars.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar";

    /// Default token cache path.
    pub const DEFAULT_TOKEN_PATH: &'static str = "token.json";

    /// Default client secrets path.
    pub const DEFAULT_CREDENTIALS_PATH: &'static str = "credentials.json";

    /// Base URL for Google Calendar API v3.
    pub const CALENDAR_API_BASE: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Google OAuth authorization endpoint.
    pub const GOOGLE_AUTH_URL: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";

    /// Google OAuth token endpoint.
    pub const GOOGLE_TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    /// Creates a configuration that reads client secrets from `credentials_path`.
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            credentials: None,
            token_path: PathBuf::from(Self::DEFAULT_TOKEN_PATH),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calimport/{}", env!("CARGO_PKG_VERSION")),
            loopback_port: 0,
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            api_base: Self::CALENDAR_API_BASE.to_string(),
            auth_url: Self::GOOGLE_AUTH_URL.to_string(),
            token_url: Self::GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// Uses the given client credentials instead of reading the secrets file.
    pub fn with_credentials(mut self, credentials: OAuthCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the token cache path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the loopback port for OAuth.
    pub fn with_loopback_port(mut self, port: u16) -> Self {
        self.loopback_port = port;
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Points the API client at a different base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Points the OAuth client at a different token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Returns the client credentials, reading the secrets file if needed.
    pub fn client_credentials(&self) -> ProviderResult<OAuthCredentials> {
        let credentials = match &self.credentials {
            Some(credentials) => credentials.clone(),
            None => OAuthCredentials::from_file(&self.credentials_path)?,
        };
        credentials.validate().map_err(|e| {
            ProviderError::configuration(format!("invalid client credentials: {}", e))
        })?;
        Ok(credentials)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }

        Ok(())
    }
}
