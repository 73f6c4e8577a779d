// Response bodies shared by the webhook endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Returned after a booking was stored
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedirectResponse {
    /// LINE official account "add friend" link
    #[schema(example = "https://lin.ee/BhjhlOm")]
    pub redirect_url: String,
}

/// Generic status body for acknowledgements and errors
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// "success" or "error"
    #[schema(example = "success")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    pub fn success_with(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}
