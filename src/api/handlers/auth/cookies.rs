//! Cookie codec for the session handle and the last-logout marker.

use anyhow::{Context, Result};
use axum::http::{
    HeaderMap, HeaderValue,
    header::{AUTHORIZATION, COOKIE, InvalidHeaderValue},
};
use url::form_urlencoded;

use super::state::AuthConfig;
use crate::auth::{LogoutMarker, SessionHandle};

pub(crate) const SESSION_COOKIE_NAME: &str = "accesso_session";
const LAST_LOGGED_PREFIX: &str = "lastLogged_";

/// Build an `HttpOnly` cookie carrying the session token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    handle: &SessionHandle,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}",
        handle.as_str()
    );
    // Only mark cookies secure when the frontend is served over HTTPS.
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Name of the per-login marker cookie; the login is form-urlencoded so any
/// login yields a valid cookie name.
pub(crate) fn last_logged_cookie_name(login: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(login.as_bytes()).collect();
    format!("{LAST_LOGGED_PREFIX}{encoded}")
}

/// Client-visible cookie holding the logout timestamp.
pub(crate) fn last_logged_cookie(config: &AuthConfig, marker: &LogoutMarker) -> Result<HeaderValue> {
    let timestamp = marker
        .timestamp()
        .context("failed to format logout timestamp")?;
    let mut cookie = format!(
        "{}={timestamp}; Path=/; SameSite=Lax",
        last_logged_cookie_name(&marker.login),
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("invalid lastLogged cookie value")
}

/// Session handle from a bearer token or the session cookie, bearer first.
pub(crate) fn extract_session_handle(headers: &HeaderMap) -> Option<SessionHandle> {
    extract_bearer_token(headers)
        .or_else(|| read_cookie(headers, SESSION_COOKIE_NAME))
        .filter(|token| !token.is_empty())
        .map(SessionHandle::new)
}

/// Value of the marker cookie for `login`, if the client sent one.
pub(crate) fn read_last_logged(headers: &HeaderMap, login: &str) -> Option<String> {
    read_cookie(headers, &last_logged_cookie_name(login)).filter(|value| !value.is_empty())
}

pub(crate) fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            (key == name).then(|| val.to_string())
        })
        .next()
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
