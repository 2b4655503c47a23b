// --- File: crates/services/medibook_backend/src/app_state.rs ---
use std::sync::Arc;

use medibook_auth::SessionManager;
use medibook_common::{features::is_auth_enabled, services::ServiceFactory};
use medibook_config::AppConfig;
use medibook_gcal::{handlers::GcalState, BookingOrchestrator};
use medibook_notify::{handlers::NotifyState, RemoteBookingClient};
use tracing::{error, info, warn};

use crate::service_factory::MedibookServiceFactory;

/// Application state shared by the router builder.
///
/// Each feature state is `None` when its integration is switched off or
/// failed to initialise. The matching routes are then not mounted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gcal_state: Option<Arc<GcalState>>,
    pub sessions: Option<Arc<SessionManager>>,
    pub notify_state: Option<Arc<NotifyState>>,
}

impl AppState {
    /// Builds the state from configuration, creating the real services.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let factory = MedibookServiceFactory::new(&config).await;
        Self::from_factory(config, &factory)
    }

    /// Builds the state around an existing service factory.
    pub fn from_factory(config: Arc<AppConfig>, service_factory: &dyn ServiceFactory) -> Self {
        let gcal_state = service_factory.calendar_service().and_then(|calendar| {
            match BookingOrchestrator::from_config(calendar, &config) {
                Ok(orchestrator) => Some(Arc::new(GcalState::new(orchestrator))),
                Err(e) => {
                    error!("Booking routes disabled: {}", e);
                    None
                }
            }
        });

        let sessions = if is_auth_enabled(&config) {
            config
                .auth
                .as_ref()
                .and_then(|auth| match SessionManager::from_config(auth) {
                    Ok(sessions) => {
                        info!("Auth enabled");
                        Some(Arc::new(sessions))
                    }
                    Err(e) => {
                        error!("Auth routes disabled: {}", e);
                        None
                    }
                })
        } else {
            None
        };

        let notify_state = service_factory.notification_service().and_then(|notifier| {
            match RemoteBookingClient::from_config(&config.notify, &config.http) {
                Ok(booking) => Some(Arc::new(NotifyState {
                    notifier,
                    booking: Arc::new(booking),
                })),
                Err(e) => {
                    warn!("Notification routes disabled: {}", e);
                    None
                }
            }
        });

        Self {
            config,
            gcal_state,
            sessions,
            notify_state,
        }
    }
}
