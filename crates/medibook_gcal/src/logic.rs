// File: crates/medibook_gcal/src/logic.rs
//! Local booking rules.
//!
//! Everything in here is pure: no I/O, and the only input besides the request
//! is the wall clock, which the `*_at` variants take explicitly. Malformed
//! timestamps never produce an error; they fail the rule that first needs them.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use medibook_common::{config_error, models::parse_timestamp, models::TimeRange, MedibookError};
use medibook_config::BookingRulesConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SUMMARY: &str = "Doctor Appointment";

/// Why a requested window cannot be booked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Cannot book in the past")]
    InPast,
    #[error("Outside working hours")]
    OutsideWorkingHours,
    #[error("Appointment must be between {min} and {max} minutes long")]
    InvalidDuration { min: i64, max: i64 },
    #[error("Time slot already booked")]
    AlreadyBooked,
}

// --- Request / response bodies ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeRequest {
    /// RFC 3339 timestamp with offset, e.g. `2025-05-12T10:00:00+03:00`.
    pub start: String,
    pub end: String,
    #[serde(default = "default_summary")]
    pub summary: String,
}

fn default_summary() -> String {
    DEFAULT_SUMMARY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityDecision {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AvailabilityDecision {
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    pub fn rejected(rejection: &Rejection) -> Self {
        Self {
            available: false,
            reason: Some(rejection.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResult {
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub status: String,
}

impl BookingResult {
    pub fn booked(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            status: "booked".to_string(),
        }
    }
}

// --- Rules ---

/// Opening hours and duration limits.
///
/// The default is a Saturday rest day, a Friday that closes at 13:00 and
/// 09:00-17:00 on every other day, with appointments of 1 to 30 minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRules {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub short_day_end: NaiveTime,
    pub rest_day: Weekday,
    pub short_day: Weekday,
    pub min_duration: Duration,
    pub max_duration: Duration,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            work_start: hm(9, 0),
            work_end: hm(17, 0),
            short_day_end: hm(13, 0),
            rest_day: Weekday::Sat,
            short_day: Weekday::Fri,
            min_duration: Duration::minutes(1),
            max_duration: Duration::minutes(30),
        }
    }
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, MedibookError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| config_error(format!("booking.{field} must be HH:MM, got '{value}'")))
}

fn parse_weekday(field: &str, value: &str) -> Result<Weekday, MedibookError> {
    Weekday::from_str(value)
        .map_err(|_| config_error(format!("booking.{field} is not a weekday: '{value}'")))
}

impl BookingRules {
    /// Applies the `[booking]` overrides on top of the defaults.
    pub fn from_config(config: &BookingRulesConfig) -> Result<Self, MedibookError> {
        let mut rules = Self::default();

        if let Some(value) = &config.work_start_time {
            rules.work_start = parse_time("work_start_time", value)?;
        }
        if let Some(value) = &config.work_end_time {
            rules.work_end = parse_time("work_end_time", value)?;
        }
        if let Some(value) = &config.short_day_end_time {
            rules.short_day_end = parse_time("short_day_end_time", value)?;
        }
        if let Some(value) = &config.rest_day {
            rules.rest_day = parse_weekday("rest_day", value)?;
        }
        if let Some(value) = &config.short_day {
            rules.short_day = parse_weekday("short_day", value)?;
        }
        if let Some(minutes) = config.min_duration_minutes {
            rules.min_duration = Duration::minutes(minutes);
        }
        if let Some(minutes) = config.max_duration_minutes {
            rules.max_duration = Duration::minutes(minutes);
        }

        if rules.min_duration > rules.max_duration {
            return Err(config_error(
                "booking.min_duration_minutes exceeds booking.max_duration_minutes",
            ));
        }
        Ok(rules)
    }

    /// Same as [`evaluate_at`](Self::evaluate_at) against the current clock.
    pub fn evaluate(&self, start: &str, end: &str) -> AvailabilityDecision {
        self.evaluate_at(start, end, Utc::now())
    }

    pub fn evaluate_at(&self, start: &str, end: &str, now: DateTime<Utc>) -> AvailabilityDecision {
        match self.validate_at(start, end, now) {
            Ok(_) => AvailabilityDecision::available(),
            Err(rejection) => AvailabilityDecision::rejected(&rejection),
        }
    }

    /// Runs the rules in order and returns the parsed range when all pass.
    ///
    /// 1. the start is not in the past (only `start` is parsed here)
    /// 2. both ends fall inside the opening hours of the start's day
    /// 3. the duration is within bounds
    pub fn validate_at(
        &self,
        start: &str,
        end: &str,
        now: DateTime<Utc>,
    ) -> Result<TimeRange, Rejection> {
        let start_at = parse_timestamp(start).map_err(|_| Rejection::InPast)?;
        if start_at.with_timezone(&Utc) < now {
            return Err(Rejection::InPast);
        }

        let end_at = parse_timestamp(end).map_err(|_| Rejection::OutsideWorkingHours)?;
        let range = TimeRange::new(start_at, end_at);

        if !self.within_working_hours(&range) {
            return Err(Rejection::OutsideWorkingHours);
        }
        if !self.duration_allowed(&range) {
            return Err(Rejection::InvalidDuration {
                min: self.min_duration.num_minutes(),
                max: self.max_duration.num_minutes(),
            });
        }
        Ok(range)
    }

    /// Times are read in the offset each timestamp was given with.
    pub fn within_working_hours(&self, range: &TimeRange) -> bool {
        let start_day = range.start.weekday();
        if start_day == self.rest_day || range.end.weekday() == self.rest_day {
            return false;
        }
        // A window running past midnight is never inside a single day's hours.
        if range.end.date_naive() > range.start.date_naive() {
            return false;
        }

        let closes_at = if start_day == self.short_day {
            self.short_day_end
        } else {
            self.work_end
        };
        range.start.time() >= self.work_start && range.end.time() <= closes_at
    }

    pub fn duration_allowed(&self, range: &TimeRange) -> bool {
        let duration = range.duration();
        duration >= self.min_duration && duration <= self.max_duration
    }
}
