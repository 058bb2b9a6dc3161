//! Route access table

use serde::Serialize;
use std::collections::HashSet;

use crate::auth::{Role, RoleSet};
use crate::config::{AccessConfig, MatchMode, RuleConfig};
use crate::error::{Error, Result};

/// One protected section of the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    pub prefix: String,
    pub roles: RoleSet,
    pub exact: bool,
}

impl RouteRule {
    pub fn prefix(prefix: &str, roles: RoleSet) -> Self {
        Self {
            prefix: prefix.to_string(),
            roles,
            exact: false,
        }
    }

    pub fn exact(path: &str, roles: RoleSet) -> Self {
        Self {
            prefix: path.to_string(),
            roles,
            exact: true,
        }
    }

    /// Whether this rule covers `path`
    pub fn matches(&self, path: &str, mode: MatchMode) -> bool {
        if self.exact {
            return trim_trailing_slash(path) == trim_trailing_slash(&self.prefix);
        }

        let Some(rest) = path.strip_prefix(self.prefix.as_str()) else {
            return false;
        };

        match mode {
            MatchMode::Prefix => true,
            MatchMode::Segment => {
                rest.is_empty() || rest.starts_with('/') || self.prefix.ends_with('/')
            }
        }
    }
}

impl From<&RuleConfig> for RouteRule {
    fn from(rule: &RuleConfig) -> Self {
        Self {
            prefix: rule.prefix.clone(),
            roles: rule.roles,
            exact: rule.exact,
        }
    }
}

impl From<&RouteRule> for RuleConfig {
    fn from(rule: &RouteRule) -> Self {
        Self {
            prefix: rule.prefix.clone(),
            roles: rule.roles,
            exact: rule.exact,
        }
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Immutable prefix to allowed-roles mapping, built once at start-up
#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    fallback: RoleSet,
    home: String,
    matching: MatchMode,
}

impl RouteTable {
    /// Build a table, rejecting configurations that could never work
    pub fn new(
        rules: Vec<RouteRule>,
        fallback: RoleSet,
        home: impl Into<String>,
        matching: MatchMode,
    ) -> Result<Self> {
        let table = Self {
            rules,
            fallback,
            home: home.into(),
            matching,
        };
        table.validate()?;
        Ok(table)
    }

    /// The built-in table for the portal's pages
    pub fn portal_default() -> Self {
        Self {
            rules: default_rules(),
            fallback: RoleSet::only(Role::Guest),
            home: "/".to_string(),
            matching: MatchMode::Segment,
        }
    }

    pub fn from_config(config: &AccessConfig) -> Result<Self> {
        let rules = if config.rules.is_empty() {
            default_rules()
        } else {
            config.rules.iter().map(RouteRule::from).collect()
        };
        Self::new(rules, config.fallback, config.home.clone(), config.matching)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn fallback(&self) -> RoleSet {
        self.fallback
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn matching(&self) -> MatchMode {
        self.matching
    }

    /// The most specific rule covering `path`. Longest prefix wins,
    /// ties go to the earlier rule.
    pub fn resolve(&self, path: &str) -> Option<&RouteRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(path, self.matching))
            .fold(None, |best: Option<&RouteRule>, rule| match best {
                Some(current) if current.prefix.len() >= rule.prefix.len() => Some(current),
                _ => Some(rule),
            })
    }

    /// Roles allowed to view `path`
    pub fn allowed_roles(&self, path: &str) -> RoleSet {
        self.resolve(path)
            .map(|rule| rule.roles)
            .unwrap_or(self.fallback)
    }

    fn validate(&self) -> Result<()> {
        if !self.home.starts_with('/') {
            return Err(Error::InvalidRouteTable(format!(
                "home '{}' must start with '/'",
                self.home
            )));
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !rule.prefix.starts_with('/') {
                return Err(Error::InvalidRouteTable(format!(
                    "prefix '{}' must start with '/'",
                    rule.prefix
                )));
            }
            if !seen.insert(rule.prefix.as_str()) {
                return Err(Error::InvalidRouteTable(format!(
                    "prefix '{}' is declared more than once",
                    rule.prefix
                )));
            }
            if rule.roles.is_empty() {
                return Err(Error::InvalidRouteTable(format!(
                    "prefix '{}' allows no roles",
                    rule.prefix
                )));
            }
        }

        let home_roles = self.allowed_roles(&self.home);
        if home_roles != RoleSet::all() {
            return Err(Error::InvalidRouteTable(format!(
                "home '{}' must be open to every role, it only allows [{}]",
                self.home, home_roles
            )));
        }

        Ok(())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::portal_default()
    }
}

fn default_rules() -> Vec<RouteRule> {
    let everyone = RoleSet::all();
    let signed_in = RoleSet::authenticated();

    vec![
        RouteRule::exact("/", everyone),
        RouteRule::prefix("/about", everyone),
        RouteRule::prefix("/services", everyone),
        RouteRule::prefix("/blogs", everyone),
        RouteRule::prefix("/contact", everyone),
        RouteRule::prefix("/login", RoleSet::only(Role::Guest)),
        RouteRule::prefix("/register", RoleSet::only(Role::Guest)),
        RouteRule::prefix("/booking", RoleSet::only(Role::Customer)),
        RouteRule::prefix("/customer", RoleSet::only(Role::Customer)),
        RouteRule::prefix("/staff", RoleSet::only(Role::Staff)),
        RouteRule::prefix("/manager", RoleSet::only(Role::Manager)),
        RouteRule::prefix("/admin", RoleSet::only(Role::Admin)),
        RouteRule::prefix("/profile", signed_in),
        RouteRule::prefix("/logout", signed_in),
    ]
}
