//! Configuration schema definitions

use serde::{Deserialize, Serialize};

use crate::auth::{Role, RoleSet};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub access: AccessConfig,
}

/// Server configuration for the portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3456
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Remote REST API the portal forwards to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Session token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_secret() -> String {
    "dna-portal-secret-key-change-in-production".to_string()
}

fn default_session_ttl() -> i64 {
    3600
}

fn default_cookie_name() -> String {
    "dna_portal_session".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            session_ttl_secs: default_session_ttl(),
            cookie_name: default_cookie_name(),
        }
    }
}

/// Route access table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Redirect target for denied navigations
    #[serde(default = "default_home")]
    pub home: String,

    #[serde(default)]
    pub matching: MatchMode,

    /// Roles allowed on paths no rule matches
    #[serde(default = "default_fallback")]
    pub fallback: RoleSet,

    /// Declared rules. Empty means the built-in portal table.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

fn default_home() -> String {
    "/".to_string()
}

fn default_fallback() -> RoleSet {
    RoleSet::only(Role::Guest)
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
            matching: MatchMode::default(),
            fallback: default_fallback(),
            rules: Vec::new(),
        }
    }
}

/// How a rule prefix is compared against a request path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Prefix must be followed by the end of the path or a `/`
    #[default]
    Segment,
    /// Raw starts-with comparison, `/admin` also matches `/admin2`
    Prefix,
}

/// A single declared route rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleConfig {
    pub prefix: String,

    pub roles: RoleSet,

    #[serde(default)]
    pub exact: bool,
}
