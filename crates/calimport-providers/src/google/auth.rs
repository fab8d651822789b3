//! Obtaining a usable Google credential.
//!
//! [`GoogleAuthenticator`] reuses the cached token when it is still valid,
//! refreshes it when it has expired, and falls back to the browser consent
//! flow otherwise. New or refreshed tokens are written back to the cache.

use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::oauth::OAuthClient;
use super::tokens::{TokenInfo, TokenStorage};

/// Produces an authorized Calendar API client.
#[derive(Debug)]
pub struct GoogleAuthenticator {
    config: GoogleConfig,
    storage: TokenStorage,
    oauth: OAuthClient,
}

impl GoogleAuthenticator {
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        let storage = TokenStorage::new(&config.token_path);
        let oauth = OAuthClient::new(&config)?;

        Ok(Self {
            config,
            storage,
            oauth,
        })
    }

    /// Returns a valid token, refreshing or re-authorizing as needed.
    ///
    /// The client secrets file is read only when the cache records no usable
    /// client.
    pub async fn authorize(&self) -> ProviderResult<TokenInfo> {
        let cached = match self.storage.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(
                    "ignoring unreadable token cache {}: {}",
                    self.storage.path().display(),
                    e
                );
                None
            }
        };

        let Some(tokens) = cached else {
            return self.authorize_interactive().await;
        };

        if !tokens.has_scopes(&self.config.scopes) {
            info!("cached token does not cover the requested scopes, re-authorizing");
            return self.authorize_interactive().await;
        }

        if !tokens.is_expired() {
            debug!("using cached access token");
            return Ok(tokens);
        }

        let Some(refresh_token) = tokens.refresh_token.clone() else {
            info!("access token expired and no refresh token is cached");
            return self.authorize_interactive().await;
        };

        self.refresh(tokens, &refresh_token).await
    }

    /// Authorizes and builds the API client in one step.
    pub async fn connect(&self) -> ProviderResult<GoogleCalendarClient> {
        let tokens = self.authorize().await?;
        GoogleCalendarClient::new(tokens.access_token, &self.config)
    }

    /// Refreshes with the client recorded in the cache, falling back to the
    /// configured secrets for caches written without one.
    async fn refresh(
        &self,
        mut tokens: TokenInfo,
        refresh_token: &str,
    ) -> ProviderResult<TokenInfo> {
        let credentials = match tokens.client_credentials() {
            Some(credentials) => credentials,
            None => self.config.client_credentials()?,
        };
        let token_url = tokens
            .token_uri
            .clone()
            .unwrap_or_else(|| self.config.token_url.clone());

        debug!("refreshing expired access token");
        let (access_token, expires_in) = self
            .oauth
            .refresh_token(&credentials, Some(token_url.as_str()), refresh_token)
            .await?;
        tokens.update_access_token(access_token, expires_in);
        if tokens.client_id.is_none() {
            tokens = tokens.with_client(
                token_url,
                credentials.client_id,
                credentials.client_secret,
            );
        }

        self.storage.save(&tokens)?;
        Ok(tokens)
    }

    async fn authorize_interactive(&self) -> ProviderResult<TokenInfo> {
        let credentials = self.config.client_credentials()?;
        let tokens = self
            .oauth
            .authorize(&credentials, &self.config.scopes, self.config.loopback_port)
            .await?;
        self.storage.save(&tokens)?;
        info!("authorization successful");
        Ok(tokens)
    }
}
