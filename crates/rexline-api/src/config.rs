// Relay configuration loaded from environment variables.
// Decision: Every setting has a development default except the LINE channel token
// Decision: Cookie signing key falls back to a random per-process key (records don't survive restarts either)

use anyhow::{anyhow, bail, Context, Result};
use axum::http::HeaderValue;
use axum_extra::extract::cookie::Key;
use rexline_core::{MessageTemplate, DEFAULT_BOOKING_TTL};
use rexline_line::DEFAULT_API_BASE_URL;
use std::net::SocketAddr;
use std::time::Duration;

/// LINE official account "add friend" link returned to the booking page
pub const DEFAULT_FRIEND_ADD_URL: &str = "https://lin.ee/BhjhlOm";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// `Key::derive_from` needs at least this much input
const MIN_SESSION_SECRET_LEN: usize = 32;

const MAX_BOOKING_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Complete relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Listen address
    pub bind_addr: SocketAddr,
    /// LINE Messaging API channel access token
    pub line_channel_access_token: String,
    /// LINE Messaging API base URL
    pub line_api_base_url: String,
    /// Redirect target returned after a booking
    pub friend_add_url: String,
    /// Secret for signing the session cookie
    pub session_secret: Option<String>,
    /// Mark the session cookie `Secure`
    pub session_cookie_secure: bool,
    /// How long a booking can be claimed
    pub booking_ttl: Duration,
    /// Delete a booking after its confirmation was pushed
    pub consume_on_delivery: bool,
    /// Confirmation text
    pub message_template: MessageTemplate,
    /// Origins allowed by CORS (empty = same-origin only)
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl RelayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr: SocketAddr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:5000")?;

        let line_channel_access_token = get("LINE_CHANNEL_ACCESS_TOKEN")
            .ok_or_else(|| anyhow!("LINE_CHANNEL_ACCESS_TOKEN environment variable required"))?;

        let session_secret = get("SESSION_SECRET");
        if let Some(secret) = &session_secret {
            if secret.len() < MIN_SESSION_SECRET_LEN {
                bail!(
                    "SESSION_SECRET must be at least {} bytes long",
                    MIN_SESSION_SECRET_LEN
                );
            }
        }

        let booking_ttl = match get("BOOKING_TTL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("BOOKING_TTL_SECS is not a number: {}", raw))?;
                let ttl = Duration::from_secs(secs);
                if ttl.is_zero() || ttl > MAX_BOOKING_TTL {
                    bail!(
                        "BOOKING_TTL_SECS must be between 1 and {}",
                        MAX_BOOKING_TTL.as_secs()
                    );
                }
                ttl
            }
            None => DEFAULT_BOOKING_TTL,
        };

        let message_template = match get("MESSAGE_TEMPLATE") {
            // Allow "\n" escapes so the template fits on one .env line
            Some(raw) => MessageTemplate::new(raw.replace("\\n", "\n"))
                .context("MESSAGE_TEMPLATE is invalid")?,
            None => MessageTemplate::default(),
        };

        // Example: CORS_ALLOWED_ORIGINS="https://booking.example.com,https://www.example.com"
        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            line_channel_access_token,
            line_api_base_url: get("LINE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            friend_add_url: get("LINE_FRIEND_ADD_URL")
                .unwrap_or_else(|| DEFAULT_FRIEND_ADD_URL.to_string()),
            session_secret,
            session_cookie_secure: parse_bool(get("SESSION_COOKIE_SECURE"), true)?,
            booking_ttl,
            consume_on_delivery: parse_bool(get("CONSUME_BOOKING_ON_DELIVERY"), false)?,
            message_template,
            cors_allowed_origins,
        })
    }

    /// Key used to sign the session cookie
    pub fn cookie_key(&self) -> Key {
        match &self.session_secret {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                tracing::warn!(
                    "SESSION_SECRET not set; using a random key, session cookies won't survive a restart"
                );
                Key::generate()
            }
        }
    }
}

fn parse_bool(value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => bail!("expected a boolean, got {:?}", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RelayConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("LINE_CHANNEL_ACCESS_TOKEN", "token")]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.line_api_base_url, "https://api.line.me");
        assert_eq!(config.friend_add_url, DEFAULT_FRIEND_ADD_URL);
        assert_eq!(config.booking_ttl, Duration::from_secs(3600));
        assert!(config.session_cookie_secure);
        assert!(!config.consume_on_delivery);
        assert!(config.session_secret.is_none());
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.message_template, MessageTemplate::default());
    }

    #[test]
    fn test_access_token_required() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("LINE_CHANNEL_ACCESS_TOKEN"));

        assert!(load(&[("LINE_CHANNEL_ACCESS_TOKEN", "   ")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("LINE_CHANNEL_ACCESS_TOKEN", "token"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("LINE_FRIEND_ADD_URL", "https://lin.ee/other"),
            ("BOOKING_TTL_SECS", "900"),
            ("CONSUME_BOOKING_ON_DELIVERY", "yes"),
            ("SESSION_COOKIE_SECURE", "false"),
            ("MESSAGE_TEMPLATE", "予約: {schedule_time}\\nURL: {meeting_url}"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com, https://b.example.com"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.friend_add_url, "https://lin.ee/other");
        assert_eq!(config.booking_ttl, Duration::from_secs(900));
        assert!(config.consume_on_delivery);
        assert!(!config.session_cookie_secure);
        assert_eq!(
            config.message_template.as_str(),
            "予約: {schedule_time}\nURL: {meeting_url}"
        );
        assert_eq!(config.cors_allowed_origins.len(), 2);
    }

    #[test]
    fn test_invalid_values() {
        let base = ("LINE_CHANNEL_ACCESS_TOKEN", "token");
        assert!(load(&[base, ("BOOKING_TTL_SECS", "an hour")]).is_err());
        assert!(load(&[base, ("BOOKING_TTL_SECS", "0")]).is_err());
        assert!(load(&[base, ("SESSION_SECRET", "short")]).is_err());
        assert!(load(&[base, ("MESSAGE_TEMPLATE", "no placeholders")]).is_err());
        assert!(load(&[base, ("CONSUME_BOOKING_ON_DELIVERY", "maybe")]).is_err());
        assert!(load(&[base, ("BIND_ADDR", "localhost")]).is_err());
    }

    #[test]
    fn test_cookie_key_is_stable_for_a_secret() {
        let secret = "0123456789abcdef0123456789abcdef";
        let config = load(&[
            ("LINE_CHANNEL_ACCESS_TOKEN", "token"),
            ("SESSION_SECRET", secret),
        ])
        .unwrap();

        assert_eq!(config.cookie_key().master(), config.cookie_key().master());
    }
}
