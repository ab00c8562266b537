use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use time::OffsetDateTime;

use super::{repo_types::Identity, session::SessionToken};
use crate::{config::SessionConfig, error::AppError, state::AppState};

/// Raw session token from the `Cookie` header, if any.
pub struct SessionCookie(pub Option<String>);

/// The authenticated identity acting on this request.
///
/// Rejects with `AppError::Unauthorized`, which renders as a redirect to `/login`.
pub struct CurrentIdentity(pub Identity);

pub(crate) fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_string())
}

/// `Set-Cookie` value for a freshly issued session.
pub(crate) fn session_cookie(cfg: &SessionConfig, token: &SessionToken) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        cfg.cookie_name,
        token.as_str()
    );
    // only remembered sessions survive a browser restart
    if token.remember {
        let max_age = (token.expires_at - OffsetDateTime::now_utc())
            .whole_seconds()
            .max(0);
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    if cfg.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub(crate) fn clear_session_cookie(cfg: &SessionConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        cfg.cookie_name
    )
}

#[async_trait]
impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionCookie(read_cookie(
            &parts.headers,
            &state.config.session.cookie_name,
        )))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, &state.config.session.cookie_name);
        let identity = state.sessions.require_identity(token.as_deref()).await?;
        Ok(CurrentIdentity(identity))
    }
}
