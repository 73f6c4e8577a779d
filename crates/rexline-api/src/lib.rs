// Rexline API Library
// Decision: Library + thin binary so router tests can build the app without the network

pub mod app;
pub mod config;
pub mod dto;
pub mod error;
pub mod health;
pub mod line;
pub mod session;
pub mod timerex;

pub use app::{build_router, ApiDoc, AppState};
pub use config::RelayConfig;
pub use error::ApiError;
