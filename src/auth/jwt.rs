//! Session token handling

use crate::auth::models::{Role, SessionUser};
use crate::config::AuthConfig;
use crate::error::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (remote user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// User role
    pub role: String,
    /// Bearer credential issued by the remote API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Token ID
    pub jti: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for a signed-in user
    pub fn for_user(user: &SessionUser, api_token: Option<String>, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user.id.clone(),
            name: user.name.clone(),
            role: user.role.to_string(),
            api_token,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// Get user role, unknown values fall back to guest
    pub fn get_role(&self) -> Role {
        Role::from_claim(&self.role)
    }
}

/// Signing keys for session tokens
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.secret, config.session_ttl_secs)
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a session token for the given user
    pub fn issue(&self, user: &SessionUser, api_token: Option<String>) -> Result<String> {
        let claims = SessionClaims::for_user(user, api_token, self.ttl_secs);
        self.encode(&claims)
    }

    /// Sign arbitrary claims
    pub fn encode(&self, claims: &SessionClaims) -> Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Validate and decode a session token
    pub fn decode(&self, token: &str) -> Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new("unit-test-secret", 3600)
    }

    #[test]
    fn test_issue_and_decode_token() {
        let user = SessionUser::new("u-1", "Ada", Role::Admin);
        let token = keys().issue(&user, Some("remote-abc".to_string())).unwrap();
        let claims = keys().decode(&token).unwrap();

        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.get_role(), Role::Admin);
        assert_eq!(claims.api_token.as_deref(), Some("remote-abc"));
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_invalid_token() {
        assert!(keys().decode("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = SessionUser::new("u-2", "Bo", Role::Customer);
        let token = keys().issue(&user, None).unwrap();
        let other = SessionKeys::new("another-secret", 3600);
        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = SessionUser::new("u-3", "Cy", Role::Staff);
        // Well past the default 60 second leeway
        let claims = SessionClaims::for_user(&user, None, -600);
        let token = keys().encode(&claims).unwrap();
        assert!(claims.exp < claims.iat);
        assert!(keys().decode(&token).is_err());
    }
}
