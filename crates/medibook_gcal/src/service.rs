// --- File: crates/medibook_gcal/src/service.rs ---
use std::{path::Path, sync::Arc, time::Duration};

use async_trait::async_trait;
use medibook_common::{
    config_error, create_client,
    models::{CalendarEvent, NewCalendarEvent, TimeRange},
    services::{CalendarError, CalendarService},
    MedibookError,
};
use medibook_config::{GcalConfig, HttpConfig};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{service_account_identity, TokenProvider};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar v3 REST client for a single calendar.
pub struct GoogleCalendarService {
    client: Client,
    tokens: Arc<TokenProvider>,
    base_url: Url,
    calendar_id: String,
}

#[derive(Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

#[derive(Serialize)]
struct EventBody<'a> {
    summary: &'a str,
    start: EventTime<'a>,
    end: EventTime<'a>,
}

#[derive(Serialize)]
struct EventTime<'a> {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: &'a str,
}

impl GoogleCalendarService {
    pub fn new(
        client: Client,
        tokens: Arc<TokenProvider>,
        api_base_url: &str,
        calendar_id: impl Into<String>,
    ) -> Result<Self, MedibookError> {
        let base_url = Url::parse(api_base_url)
            .map_err(|e| config_error(format!("invalid calendar api url '{api_base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(config_error(format!(
                "calendar api url cannot carry a path: '{api_base_url}'"
            )));
        }

        Ok(Self {
            client,
            tokens,
            base_url,
            calendar_id: calendar_id.into(),
        })
    }

    /// Builds the gateway with the service-account credentials named in `[gcal]`.
    pub async fn from_config(
        gcal: &GcalConfig,
        http: &HttpConfig,
    ) -> Result<Self, MedibookError> {
        let calendar_id = gcal
            .calendar_id
            .as_deref()
            .ok_or_else(|| config_error("GCal calendar_id missing"))?;
        let key_path = gcal
            .key_path
            .as_deref()
            .ok_or_else(|| config_error("GCal key_path missing"))?;

        let timeout = Duration::from_secs(http.timeout_secs);
        let identity = service_account_identity(Path::new(key_path), timeout)
            .await
            .map_err(config_error)?;
        let client = create_client(http.timeout_secs, true)?;

        info!("Google Calendar gateway configured for calendar {}", calendar_id);
        Self::new(
            client,
            Arc::new(TokenProvider::new(identity)),
            gcal.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
            calendar_id,
        )
    }

    fn events_url(&self) -> Result<Url, CalendarError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CalendarError::Transport("calendar api url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    /// Turns a non-success response into a provider error with the raw body.
    async fn ensure_success(&self, response: Response) -> Result<Response, CalendarError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }

        let body = response.text().await.map_err(|e| {
            warn!("Calendar provider answered {} with an unreadable body: {}", status, e);
            transport(e)
        })?;
        warn!("Calendar provider answered {}: {}", status, body);
        Err(CalendarError::Provider {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(err: reqwest::Error) -> CalendarError {
    CalendarError::Transport(err.to_string())
}

#[async_trait]
impl CalendarService for GoogleCalendarService {
    async fn list_events(&self, range: &TimeRange) -> Result<Vec<CalendarEvent>, CalendarError> {
        let token = self.tokens.get_token().await?;
        let query = [
            ("timeMin", range.start.to_rfc3339()),
            ("timeMax", range.end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];

        let response = self
            .client
            .get(self.events_url()?)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(transport)?;
        let response = self.ensure_success(response).await?;

        let list: EventList = response
            .json()
            .await
            .map_err(|e| CalendarError::Decode(e.to_string()))?;
        debug!("Calendar returned {} event(s)", list.items.len());
        Ok(list.items)
    }

    async fn create_event(&self, event: &NewCalendarEvent) -> Result<String, CalendarError> {
        let token = self.tokens.get_token().await?;
        let body = EventBody {
            summary: &event.summary,
            start: EventTime {
                date_time: event.range.start.to_rfc3339(),
                time_zone: &event.time_zone,
            },
            end: EventTime {
                date_time: event.range.end.to_rfc3339(),
                time_zone: &event.time_zone,
            },
        };

        let response = self
            .client
            .post(self.events_url()?)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = self.ensure_success(response).await?;

        let created: CalendarEvent = response
            .json()
            .await
            .map_err(|e| CalendarError::Decode(e.to_string()))?;
        created
            .id
            .ok_or_else(|| CalendarError::Decode("created event has no id".to_string()))
    }
}
