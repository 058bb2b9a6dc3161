//! Authentication and session handling

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod session;

pub use jwt::{SessionClaims, SessionKeys};
pub use middleware::{extract_session, session_token};
pub use models::{Credentials, LoginResponse, Role, RoleSet, SessionUser, UserInfo};
pub use session::{clear_session_cookie, role_of, session_cookie, Session};
