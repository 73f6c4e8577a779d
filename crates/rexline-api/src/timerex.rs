// TimeRex webhook route

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use rexline_core::BookingOutcome;

use crate::app::AppState;
use crate::dto::{RedirectResponse, StatusResponse};
use crate::error::ApiError;

/// Create TimeRex webhook routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/webhook/timerex", post(timerex_webhook))
        .with_state(state)
}

/// POST /webhook/timerex - Park a booking until the visitor follows on LINE
///
/// The body is read as raw bytes because TimeRex does not always declare a
/// JSON content type.
#[utoipa::path(
    post,
    path = "/webhook/timerex",
    request_body(content = serde_json::Value, description = "TimeRex webhook payload"),
    responses(
        (status = 200, description = "Booking stored; visitor should follow the LINE account", body = RedirectResponse),
        (status = 400, description = "Malformed or unrecognized payload", body = StatusResponse),
        (status = 500, description = "Internal server error", body = StatusResponse)
    ),
    tag = "webhooks"
)]
pub async fn timerex_webhook(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    body: Bytes,
) -> Result<Response, ApiError> {
    match state.relay.receive_booking(&body).await? {
        BookingOutcome::Stored { token, .. } => {
            let jar = jar.add(state.session.cookie(token));
            let body = RedirectResponse {
                redirect_url: state.friend_add_url.to_string(),
            };
            Ok((jar, Json(body)).into_response())
        }
        BookingOutcome::Acknowledged { .. } => {
            Ok(Json(StatusResponse::success_with("LINE Webhook data processed")).into_response())
        }
    }
}
