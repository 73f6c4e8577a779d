// HTTP error mapping
//
// Every failure leaves the API as `{"status": "error", "message": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rexline_core::RelayError;

use crate::dto::StatusResponse;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::MalformedPayload(_) => ApiError::bad_request("Invalid JSON format"),
            e if e.is_client_error() => ApiError::bad_request(e.to_string()),
            e => {
                tracing::error!(error = %e, "Unexpected relay error");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(StatusResponse::error(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let cases = [
            (RelayError::malformed("eof"), "Invalid JSON format"),
            (RelayError::MissingEventData, "'event' key is missing"),
            (
                RelayError::UnrecognizedShape,
                "payload matches neither the TimeRex nor the LINE webhook shape",
            ),
            (RelayError::MissingSessionToken, "session ID is missing"),
        ];

        for (err, message) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, StatusCode::BAD_REQUEST);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        for err in [
            RelayError::store("lock poisoned"),
            RelayError::Internal(anyhow::anyhow!("disk on fire")),
            RelayError::delivery("timeout"),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api.message, INTERNAL_ERROR_MESSAGE);
        }
    }
}
