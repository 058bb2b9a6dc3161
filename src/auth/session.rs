//! Session record carried by the browser

use serde::Serialize;

use crate::auth::jwt::SessionClaims;
use crate::auth::models::Role;

/// The caller's session as seen by one request.
///
/// The server keeps no session state; everything here comes from the signed
/// token the browser presents. A missing or unusable token is a guest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    /// Bearer credential for the remote API, never serialized
    #[serde(skip)]
    pub api_token: Option<String>,
}

impl Session {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn from_claims(claims: SessionClaims) -> Self {
        let role = claims.get_role();
        Self {
            user_id: Some(claims.sub),
            name: Some(claims.name),
            role,
            api_token: claims.api_token,
        }
    }

    pub fn is_guest(&self) -> bool {
        !self.role.is_authenticated()
    }
}

/// Role of an optional session, absent means guest
pub fn role_of(session: Option<&Session>) -> Role {
    session.map(|s| s.role).unwrap_or_default()
}

/// `Set-Cookie` value storing a session token
pub fn session_cookie(name: &str, token: &str, ttl_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name, token, ttl_secs
    )
}

/// `Set-Cookie` value removing the session token
pub fn clear_session_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}
