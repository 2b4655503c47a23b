// --- File: crates/services/medibook_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the external services the configuration asks for. A service that
//! fails to initialise is logged and left out; the routes depending on it are
//! then not mounted.
use std::sync::Arc;

use medibook_common::{
    features::{is_email_enabled, is_gcal_enabled},
    log_result,
    services::{CalendarService, NotificationService, ServiceFactory},
};
use medibook_config::AppConfig;
use medibook_gcal::service::GoogleCalendarService;
use medibook_notify::SmtpNotificationService;
use tracing::info;

pub struct MedibookServiceFactory {
    calendar_service: Option<Arc<dyn CalendarService>>,
    notification_service: Option<Arc<dyn NotificationService>>,
}

impl MedibookServiceFactory {
    /// Create a new service factory.
    pub async fn new(config: &AppConfig) -> Self {
        let mut calendar_service: Option<Arc<dyn CalendarService>> = None;
        if let (true, Some(gcal)) = (is_gcal_enabled(config), config.gcal.as_ref()) {
            info!("Initializing Google Calendar service...");
            calendar_service = log_result(
                GoogleCalendarService::from_config(gcal, &config.http).await,
                "Google Calendar service ready",
                "Google Calendar service unavailable",
            )
            .ok()
            .map(|service| Arc::new(service) as Arc<dyn CalendarService>);
        }

        let mut notification_service: Option<Arc<dyn NotificationService>> = None;
        if let (true, Some(smtp)) = (is_email_enabled(config), config.smtp.as_ref()) {
            info!("Initializing SMTP notification service...");
            notification_service = log_result(
                SmtpNotificationService::from_config(smtp),
                "SMTP notification service ready",
                "SMTP notification service unavailable",
            )
            .ok()
            .map(|service| Arc::new(service) as Arc<dyn NotificationService>);
        }

        Self {
            calendar_service,
            notification_service,
        }
    }

    /// A factory around ready-made services.
    pub fn with_services(
        calendar_service: Option<Arc<dyn CalendarService>>,
        notification_service: Option<Arc<dyn NotificationService>>,
    ) -> Self {
        Self {
            calendar_service,
            notification_service,
        }
    }
}

impl ServiceFactory for MedibookServiceFactory {
    fn calendar_service(&self) -> Option<Arc<dyn CalendarService>> {
        self.calendar_service.clone()
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService>> {
        self.notification_service.clone()
    }
}
