//! Session extraction from requests

use axum::http::{header, HeaderMap};

use crate::auth::jwt::SessionKeys;
use crate::auth::session::Session;

/// Find the raw session token in the request headers.
/// The `Authorization: Bearer` header wins over the cookie.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.trim());
            }
        }
    }

    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_str) = cookie_header.to_str() else {
            continue;
        };
        for cookie in cookie_str.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                if name == cookie_name && !value.is_empty() {
                    return Some(value);
                }
            }
        }
    }

    None
}

/// Resolve the caller's session. Never fails: anything unusable is a guest.
pub fn extract_session(headers: &HeaderMap, keys: &SessionKeys, cookie_name: &str) -> Session {
    let Some(token) = session_token(headers, cookie_name) else {
        return Session::guest();
    };

    match keys.decode(token) {
        Ok(claims) => Session::from_claims(claims),
        Err(e) => {
            tracing::debug!("Ignoring unusable session token: {}", e);
            Session::guest()
        }
    }
}
