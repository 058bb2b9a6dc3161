//! JSON API route handlers

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::{
    clear_session_cookie, extract_session, session_cookie, Credentials, LoginResponse, Role,
    UserInfo,
};
use crate::error::{Error, Result};
use crate::guard::{Decision, RouteRule};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    pub path: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct GuardCheck {
    pub path: String,
    pub role: Role,
    #[serde(flatten)]
    pub decision: Decision,
}

#[derive(Debug, Serialize)]
pub struct RoutesView<'a> {
    pub home: &'a str,
    pub fallback: Vec<Role>,
    pub rules: &'a [RouteRule],
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Session routes

pub async fn login(
    State(state): State<SharedState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse> {
    let remote = state.remote.login(&credentials).await?;
    let user = remote.user.into_session_user();
    if !user.role.is_authenticated() {
        tracing::warn!("Account {} has no recognised portal role", user.id);
        return Err(Error::NoPortalAccess);
    }
    let token = state.keys.issue(&user, Some(remote.token))?;

    tracing::info!(user = %user.id, role = %user.role, "User signed in");

    let cookie = session_cookie(&state.config.auth.cookie_name, &token, state.keys.ttl_secs());
    let body = LoginResponse {
        token,
        user: UserInfo::from(user),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(ApiResponse::ok(body))))
}

pub async fn logout(State(state): State<SharedState>) -> impl IntoResponse {
    let cookie = clear_session_cookie(&state.config.auth.cookie_name);
    ([(header::SET_COOKIE, cookie)], Json(ApiResponse::ok("signed out")))
}

pub async fn session_info(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    let session = extract_session(&headers, &state.keys, &state.config.auth.cookie_name);
    Json(ApiResponse::ok(session))
}

// Guard diagnostics

/// Evaluate the guard for a path. Without an explicit `role` the caller's own
/// session is used.
pub async fn guard_check(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<GuardQuery>,
) -> impl IntoResponse {
    let role = query.role.unwrap_or_else(|| {
        extract_session(&headers, &state.keys, &state.config.auth.cookie_name).role
    });
    let decision = state.guard.check(&query.path, role);

    Json(ApiResponse::ok(GuardCheck {
        path: query.path,
        role,
        decision,
    }))
}

pub async fn list_routes(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    let table = state.guard.table();
    let view = RoutesView {
        home: table.home(),
        fallback: table.fallback().into(),
        rules: table.rules(),
    };
    // The view borrows the shared state, so serialize it here
    let body = serde_json::to_value(&view)?;
    Ok(Json(ApiResponse::ok(body)))
}
