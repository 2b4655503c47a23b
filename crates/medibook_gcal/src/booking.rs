// File: crates/medibook_gcal/src/booking.rs
//! Availability checks and bookings against the doctor's calendar.

use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use medibook_common::{
    config_error,
    models::{CalendarEvent, NewCalendarEvent, TimeRange},
    services::{CalendarError, CalendarService},
    MedibookError,
};
use medibook_config::AppConfig;
use thiserror::Error;
use tracing::{info, warn};

use crate::logic::{AvailabilityDecision, BookingResult, BookingRules, Rejection, TimeRequest};

pub const DEFAULT_TIME_ZONE: &str = "Asia/Jerusalem";
pub const DEFAULT_UPCOMING_DAYS: i64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The request could not be turned into a time range.
    #[error("malformed booking request: {0}")]
    Malformed(String),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Combines the local rules with the remote calendar.
pub struct BookingOrchestrator {
    calendar: Arc<dyn CalendarService>,
    rules: BookingRules,
    time_zone: Tz,
    upcoming_days: i64,
}

impl BookingOrchestrator {
    pub fn new(calendar: Arc<dyn CalendarService>, rules: BookingRules, time_zone: Tz) -> Self {
        Self {
            calendar,
            rules,
            time_zone,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }

    pub fn with_upcoming_days(mut self, days: i64) -> Self {
        self.upcoming_days = days;
        self
    }

    /// Builds the orchestrator from the `[gcal]` and `[booking]` sections.
    pub fn from_config(
        calendar: Arc<dyn CalendarService>,
        config: &AppConfig,
    ) -> Result<Self, MedibookError> {
        let gcal = config
            .gcal
            .as_ref()
            .ok_or_else(|| config_error("GCal config missing"))?;

        let zone_name = gcal.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE);
        let time_zone = Tz::from_str(zone_name)
            .map_err(|_| config_error(format!("gcal.time_zone is not an IANA zone: '{zone_name}'")))?;
        let rules = BookingRules::from_config(&config.booking)?;

        Ok(Self::new(calendar, rules, time_zone)
            .with_upcoming_days(gcal.upcoming_days.unwrap_or(DEFAULT_UPCOMING_DAYS)))
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    pub async fn check_availability(
        &self,
        request: &TimeRequest,
    ) -> Result<AvailabilityDecision, CalendarError> {
        self.check_availability_at(request, Utc::now()).await
    }

    /// Local rules first; the calendar is only queried when they pass.
    pub async fn check_availability_at(
        &self,
        request: &TimeRequest,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityDecision, CalendarError> {
        let range = match self.rules.validate_at(&request.start, &request.end, now) {
            Ok(range) => range,
            Err(rejection) => {
                info!("Slot {} - {} rejected: {}", request.start, request.end, rejection);
                return Ok(AvailabilityDecision::rejected(&rejection));
            }
        };

        let events = self.calendar.list_events(&range).await?;
        if events.is_empty() {
            Ok(AvailabilityDecision::available())
        } else {
            info!("Slot {} - {} overlaps {} event(s)", request.start, request.end, events.len());
            Ok(AvailabilityDecision::rejected(&Rejection::AlreadyBooked))
        }
    }

    /// Creates the event without re-checking availability; callers are expected
    /// to have called [`check_availability`](Self::check_availability) first.
    pub async fn book(&self, request: &TimeRequest) -> Result<BookingResult, BookingError> {
        let range = TimeRange::parse(&request.start, &request.end)
            .map_err(|e| BookingError::Malformed(e.to_string()))?;
        if range.end <= range.start {
            return Err(BookingError::Malformed(
                "end must be after start".to_string(),
            ));
        }

        let event = NewCalendarEvent {
            range,
            summary: request.summary.clone(),
            time_zone: self.time_zone.name().to_string(),
        };

        let event_id = self.calendar.create_event(&event).await.map_err(|e| {
            warn!("Calendar refused booking {} - {}: {}", request.start, request.end, e);
            e
        })?;

        info!("Booked '{}' as event {}", request.summary, event_id);
        Ok(BookingResult::booked(event_id))
    }

    /// Events from `now` until the end of the configured look-ahead window.
    pub async fn upcoming_appointments(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let range = TimeRange::new(
            now.fixed_offset(),
            (now + Duration::days(self.upcoming_days)).fixed_offset(),
        );
        self.calendar.list_events(&range).await
    }
}
