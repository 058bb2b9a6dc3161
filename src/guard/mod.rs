//! Route guard
//!
//! Decides, for every page navigation, whether the caller's role may see the
//! requested path or must be sent back to the home page. The decision is a
//! pure function of the route table, the path and the session; the axum
//! middleware in [`middleware`] only supplies the inputs and applies the
//! result.

pub mod middleware;
pub mod table;

pub use middleware::route_guard;
pub use table::{RouteRule, RouteTable};

use serde::Serialize;
use std::sync::Arc;

use crate::auth::{role_of, Role, Session};

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Redirect {
        #[serde(rename = "redirect")]
        to: String,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Redirect { to } => Some(to),
        }
    }
}

/// Check `role` against the rule covering `path`
pub fn decide(table: &RouteTable, path: &str, role: Role) -> Decision {
    if table.allowed_roles(path).contains(role) {
        Decision::Allow
    } else {
        Decision::Redirect {
            to: table.home().to_string(),
        }
    }
}

/// Guard a navigation with an explicitly passed session; no session is a guest
pub fn evaluate(table: &RouteTable, path: &str, session: Option<&Session>) -> Decision {
    decide(table, path, role_of(session))
}

/// Shared handle on the route table
#[derive(Debug, Clone, Default)]
pub struct Guard {
    table: Arc<RouteTable>,
}

impl Guard {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn check(&self, path: &str, role: Role) -> Decision {
        decide(&self.table, path, role)
    }

    pub fn evaluate(&self, path: &str, session: Option<&Session>) -> Decision {
        evaluate(&self.table, path, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            role,
            ..Session::guest()
        }
    }

    #[test]
    fn test_guest_can_open_login() {
        let table = RouteTable::portal_default();
        assert_eq!(evaluate(&table, "/login", None), Decision::Allow);
    }

    #[test]
    fn test_customer_bounced_from_admin() {
        let table = RouteTable::portal_default();
        let decision = evaluate(&table, "/admin/users", Some(&session(Role::Customer)));
        assert_eq!(decision.redirect_target(), Some("/"));
    }

    #[test]
    fn test_signed_in_user_bounced_from_login() {
        let table = RouteTable::portal_default();
        let decision = evaluate(&table, "/login", Some(&session(Role::Manager)));
        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_guard_handle_matches_free_function() {
        let guard = Guard::default();
        for role in Role::ALL {
            for path in ["/", "/admin/kits", "/booking", "/unknown"] {
                assert_eq!(
                    guard.check(path, role),
                    decide(guard.table(), path, role),
                    "{} on {}",
                    role,
                    path
                );
            }
        }
    }

    #[test]
    fn test_decision_serializes_with_tag() {
        let json = serde_json::to_string(&Decision::Redirect { to: "/".to_string() }).unwrap();
        assert_eq!(json, r#"{"decision":"redirect","redirect":"/"}"#);
        let json = serde_json::to_string(&Decision::Allow).unwrap();
        assert_eq!(json, r#"{"decision":"allow"}"#);
    }
}
