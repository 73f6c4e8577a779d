// Router assembly
// Decision: One AppState shared by both webhook routes (relay + cookie settings)
// Decision: Panics inside handlers become the same generic 500 body as other internal errors

use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    Router,
};
use axum_extra::extract::cookie::Key;
use rexline_core::BookingRelay;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::RelayConfig;
use crate::dto::{RedirectResponse, StatusResponse};
use crate::error::ApiError;
use crate::health::{self, HealthResponse};
use crate::line;
use crate::session::SessionSettings;
use crate::timerex;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub relay: BookingRelay,
    pub friend_add_url: Arc<str>,
    pub session: SessionSettings,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(relay: BookingRelay, config: &RelayConfig) -> Self {
        Self {
            relay,
            friend_add_url: Arc::from(config.friend_add_url.as_str()),
            session: SessionSettings {
                max_age: config.booking_ttl,
                secure: config.session_cookie_secure,
            },
            cookie_key: config.cookie_key(),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        timerex::timerex_webhook,
        line::line_webhook,
        health::home,
        health::health,
    ),
    components(schemas(RedirectResponse, StatusResponse, HealthResponse)),
    tags(
        (name = "webhooks", description = "TimeRex and LINE webhook receivers"),
        (name = "health", description = "Liveness endpoints")
    ),
    info(
        title = "Rexline API",
        version = "0.1.0",
        description = "Relays TimeRex booking confirmations to LINE users",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// Build the full application router
pub fn build_router(state: AppState, cors_origins: &[HeaderValue]) -> Router {
    let app = Router::new()
        .merge(health::routes())
        .merge(timerex::routes(state.clone()))
        .merge(line::routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins.iter().cloned()))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                .allow_credentials(true),
        )
    } else {
        app
    };

    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::internal().into_response()
}
