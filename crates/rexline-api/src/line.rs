// LINE webhook route

use axum::{body::Bytes, extract::State, routing::post, Json, Router};

use crate::app::AppState;
use crate::dto::StatusResponse;
use crate::error::ApiError;
use crate::session::SessionToken;

/// Create LINE webhook routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/webhook/line", post(line_webhook))
        .with_state(state)
}

/// POST /webhook/line - Push the pending booking to a user who just followed
///
/// Answers 200 whatever happened to individual events so LINE doesn't
/// redeliver; only a missing session token or an unreadable body is an error.
#[utoipa::path(
    post,
    path = "/webhook/line",
    request_body(content = serde_json::Value, description = "LINE Messaging API webhook payload"),
    params(
        ("x-correlation-token" = Option<String>, Header, description = "Correlation token when no session cookie is available")
    ),
    responses(
        (status = 200, description = "Events processed", body = StatusResponse),
        (status = 400, description = "Missing session token or malformed payload", body = StatusResponse),
        (status = 500, description = "Internal server error", body = StatusResponse)
    ),
    tag = "webhooks"
)]
pub async fn line_webhook(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let report = state.relay.receive_line_events(&body, token).await?;

    tracing::debug!(
        follow_events = report.follow_events,
        notified = report.notified,
        not_found = report.not_found,
        delivery_failures = report.delivery_failures,
        skipped = report.skipped,
        "LINE webhook processed"
    );

    Ok(Json(StatusResponse::success()))
}
