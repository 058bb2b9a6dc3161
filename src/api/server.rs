//! HTTP server and router

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::SessionKeys;
use crate::config::Config;
use crate::error::Result;
use crate::guard::{route_guard, Guard, RouteTable};
use crate::remote::ApiClient;
use crate::ui::{self, Pages};

use super::routes;

/// Application state shared across handlers. Read-only after start-up.
pub struct AppState {
    pub config: Config,
    pub guard: Guard,
    pub keys: SessionKeys,
    pub remote: ApiClient,
    pub pages: Pages,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let table = RouteTable::from_config(&config.access)?;
        let keys = SessionKeys::from_config(&config.auth);
        let remote = ApiClient::new(&config.api)?;
        let pages = Pages::new()?;

        Ok(Self {
            guard: Guard::new(table),
            keys,
            remote,
            pages,
            config,
        })
    }
}

pub type SharedState = Arc<AppState>;

/// Run the portal server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(config)?);
    tracing::info!(
        "Route table loaded with {} rules, remote API at {}",
        state.guard.table().rules().len(),
        state.remote.base_url()
    );

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes.
/// Every page, including unknown paths, passes through the route guard;
/// the JSON API under `/api` does not.
pub fn create_router(state: SharedState) -> Router {
    let pages = Router::new()
        .route("/", get(ui::home))
        .route("/about", get(ui::marketing))
        .route("/services", get(ui::marketing))
        .route("/blogs", get(ui::marketing))
        .route("/contact", get(ui::marketing))
        .route("/login", get(ui::login_form).post(ui::login_submit))
        .route("/register", get(ui::register_form).post(ui::register_submit))
        .route("/logout", post(ui::logout))
        .route("/booking", get(ui::booking_form).post(ui::booking_submit))
        .route("/profile", get(ui::profile))
        .route("/{section}", get(ui::dashboard))
        .route("/{section}/{resource}", get(ui::resource_list))
        .route("/{section}/{resource}/{id}", get(ui::resource_detail))
        .route("/{section}/{resource}/{id}/delete", post(ui::resource_delete))
        .fallback(ui::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), route_guard));

    let api = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route("/api/session", get(routes::session_info))
        .route("/api/guard/check", get(routes::guard_check))
        .route("/api/routes", get(routes::list_routes));

    pages
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
