//! Google Calendar API client.
//!
//! A thin HTTP client for the three Calendar API v3 calls the importer
//! makes: list the calendar list, insert a calendar, insert an event.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::service::{
    BoxFuture, CalendarListEntry, CalendarService, CreatedEvent, EventPayload, NewCalendar,
};

use super::config::GoogleConfig;

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    api_base: String,
}

impl GoogleCalendarClient {
    /// Creates a client that authenticates every request with `access_token`.
    pub fn new(access_token: impl Into<String>, config: &GoogleConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            api_base: config.api_base.clone(),
        })
    }

    /// Lists every calendar on the user's calendar list, following pagination.
    pub async fn list_calendars(&self) -> ProviderResult<Vec<CalendarListEntry>> {
        let url = format!("{}/users/me/calendarList", self.api_base);
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http_client.get(&url).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: CalendarListResponse = Self::send(request).await?;
            calendars.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("calendar list has {} entries", calendars.len());
        Ok(calendars)
    }

    /// Creates a secondary calendar.
    pub async fn insert_calendar(&self, calendar: &NewCalendar) -> ProviderResult<CalendarListEntry> {
        let url = format!("{}/calendars", self.api_base);
        let request = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(calendar);

        Self::send(request).await
    }

    /// Creates an event in `calendar_id`.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventPayload,
    ) -> ProviderResult<CreatedEvent> {
        let url = format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(calendar_id)
        );
        let request = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(event);

        Self::send(request).await
    }

    async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> ProviderResult<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout").with_source(e)
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::from_response(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })
    }
}

impl CalendarService for GoogleCalendarClient {
    fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarListEntry>>> {
        Box::pin(GoogleCalendarClient::list_calendars(self))
    }

    fn insert_calendar<'a>(
        &'a self,
        calendar: &'a NewCalendar,
    ) -> BoxFuture<'a, ProviderResult<CalendarListEntry>> {
        Box::pin(GoogleCalendarClient::insert_calendar(self, calendar))
    }

    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a EventPayload,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(GoogleCalendarClient::insert_event(self, calendar_id, event))
    }
}

/// One page of the calendar list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
    next_page_token: Option<String>,
}
