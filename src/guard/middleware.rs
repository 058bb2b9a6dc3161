//! Axum middleware applying the route guard to page requests

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::Decision;
use crate::api::server::SharedState;
use crate::auth::extract_session;

/// Resolve the session, run the guard, then either render or redirect.
/// Allowed requests carry the resolved [`crate::auth::Session`] as an extension.
pub async fn route_guard(State(state): State<SharedState>, mut req: Request, next: Next) -> Response {
    let session = extract_session(req.headers(), &state.keys, &state.config.auth.cookie_name);

    // Path extractors see decoded segments, so the guard must too
    let path = match urlencoding::decode(req.uri().path()) {
        Ok(path) => path.into_owned(),
        Err(_) => {
            tracing::info!(path = %req.uri().path(), "Navigation denied, path is not valid UTF-8");
            return Redirect::to(state.guard.table().home()).into_response();
        }
    };

    match state.guard.evaluate(&path, Some(&session)) {
        Decision::Allow => {
            tracing::debug!(path = %path, role = %session.role, "Navigation allowed");
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Decision::Redirect { to } => {
            tracing::info!(path = %path, role = %session.role, redirect = %to, "Navigation denied");
            Redirect::to(&to).into_response()
        }
    }
}
