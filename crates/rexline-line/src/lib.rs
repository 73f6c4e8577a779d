// LINE Messaging API Implementation
//
// This crate provides the production PushClient for rexline-core. It calls
// LINE's push message endpoint with a channel access token so the relay can
// message a user who just followed the official account.

mod client;
mod types;


pub use client::{LineApiError, LinePushClient, DEFAULT_API_BASE_URL, MAX_TEXT_LENGTH};
pub use types::{LineErrorResponse, PushMessageRequest, TextMessage};

// Re-export core types for convenience
pub use rexline_core::notifier::PushClient;
