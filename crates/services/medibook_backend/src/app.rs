// --- File: crates/services/medibook_backend/src/app.rs ---
use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use medibook_auth::require_bearer;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::app_state::AppState;

pub const ROOT_MESSAGE: &str = "Hello from Medibook!";

async fn root() -> Json<Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

/// Assembles the HTTP surface from whatever services the state carries.
pub fn build_router(state: &AppState) -> Router {
    let mut app = Router::new().route("/", get(root));

    if let Some(sessions) = &state.sessions {
        info!("Mounting auth routes");
        app = app.merge(medibook_auth::routes::routes(sessions.clone()));
    }

    if let Some(gcal_state) = &state.gcal_state {
        info!("Mounting booking routes");
        app = app.merge(medibook_gcal::routes::booking_routes(gcal_state.clone()));

        let protect = state
            .config
            .auth
            .as_ref()
            .is_some_and(|auth| auth.protect_doctor_routes);
        let doctor = medibook_gcal::routes::doctor_routes(gcal_state.clone());
        match (protect, &state.sessions) {
            (false, _) => app = app.merge(doctor),
            (true, Some(sessions)) => {
                info!("Doctor routes require a bearer token");
                app = app.merge(
                    doctor.route_layer(from_fn_with_state(sessions.clone(), require_bearer)),
                );
            }
            (true, None) => {
                error!("Doctor routes need auth but auth is disabled; not mounting them");
            }
        }
    } else {
        warn!("Calendar unavailable; booking routes not mounted");
    }

    if let Some(notify_state) = &state.notify_state {
        info!("Mounting notification routes");
        app = app.merge(medibook_notify::routes::routes(notify_state.clone()));
    }

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use medibook_auth::doc::AuthApiDoc;
    use medibook_gcal::doc::GcalApiDoc;
    use medibook_notify::doc::NotifyApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Medibook API",
            version = "0.1.0",
            description = "Appointment booking service",
            license(name = "MIT", url = "https://opensource.org/licenses/MIT")
        ),
        tags((name = "Medibook", description = "Core service endpoints"))
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(GcalApiDoc::openapi());
    openapi_doc.merge(AuthApiDoc::openapi());
    openapi_doc.merge(NotifyApiDoc::openapi());
    info!("Adding Swagger UI at /docs");

    SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc)
}
