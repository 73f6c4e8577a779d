// Correlation token transport
// Decision: Browser callers carry the token in a signed cookie
// Decision: Non-browser callers may send it explicitly in X-Correlation-Token

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use rexline_core::CorrelationToken;
use std::convert::Infallible;
use std::time::Duration;

pub const SESSION_COOKIE: &str = "rexline_session";
pub const TOKEN_HEADER: &str = "x-correlation-token";

/// Cookie attributes for the session cookie
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub max_age: Duration,
    pub secure: bool,
}

impl SessionSettings {
    /// Build the cookie carrying `token`
    pub fn cookie(&self, token: CorrelationToken) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(max_age))
            .build()
    }
}

/// Correlation token presented by the caller, if any.
///
/// The signed cookie wins over the header. A cookie with a bad signature or a
/// value that isn't a token counts as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(pub Option<CorrelationToken>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state).await?;

        let from_cookie = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok());

        let token = from_cookie.or_else(|| {
            parts
                .headers
                .get(TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
        });

        Ok(SessionToken(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_attributes() {
        let settings = SessionSettings {
            max_age: Duration::from_secs(3600),
            secure: true,
        };
        let token = CorrelationToken::generate();
        let cookie = settings.cookie(token);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), token.to_string());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));
    }
}
