//! Google Calendar backend.
//!
//! # Authentication Flow
//!
//! 1. A cached token is reused if it is still valid, or refreshed with the
//!    client recorded alongside it if expired
//! 2. Otherwise the user's OAuth client ID/secret is read (`credentials.json`)
//! 3. A local HTTP server is started on the loopback interface
//! 4. The browser opens Google's consent page with a PKCE challenge
//! 5. Google redirects to the loopback server with the authorization code
//! 6. The code is exchanged for access and refresh tokens
//! 7. Tokens are persisted for the next run
//!
//! # Example
//!
//! ```ignore
//! use calimport_providers::google::{GoogleAuthenticator, GoogleConfig};
//!
//! let authenticator = GoogleAuthenticator::new(GoogleConfig::new("credentials.json"))?;
//! let client = authenticator.connect().await?;
//! let calendars = client.list_calendars().await?;
//! ```

mod auth;
mod client;
mod config;
mod oauth;
mod tokens;

pub use auth::GoogleAuthenticator;
pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, OAuthCredentials};
pub use oauth::{OAuthClient, PkceFlow};
pub use tokens::{TokenInfo, TokenStorage};
