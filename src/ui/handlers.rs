//! Web UI handlers
//!
//! Every handler here runs behind the route guard, which has already decided
//! the caller may see the page and left the resolved session in the request
//! extensions.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use minijinja::{context, Value};
use serde::{Deserialize, Serialize};

use super::catalog::{self, ResourceView};
use super::forms::{BookingForm, FieldErrors, LoginForm, RegisterForm, BOOKABLE_SERVICES};
use crate::api::server::{AppState, SharedState};
use crate::auth::{clear_session_cookie, session_cookie, Credentials, Session};
use crate::error::{Error, Result};

/// Render a template into a response with the given status
fn page(
    state: &AppState,
    session: &Session,
    status: StatusCode,
    template: &str,
    ctx: Value,
) -> Result<Response> {
    let html = state.pages.render(template, session, &state.guard, ctx)?;
    Ok((status, Html(html)).into_response())
}

fn not_found_page(state: &AppState, session: &Session) -> Result<Response> {
    page(
        state,
        session,
        StatusCode::NOT_FOUND,
        "not_found.html",
        context! { title => "Not found" },
    )
}

/// Message shown to the user when the remote API call failed
fn remote_error_message(err: &Error) -> String {
    match err {
        Error::RemoteStatus { message, .. } => message.clone(),
        Error::Remote(_) => "The service is temporarily unavailable, please try again later".to_string(),
        other => other.to_string(),
    }
}

// Marketing pages

const MARKETING: &[(&str, &str, &[&str])] = &[
    (
        "/about",
        "About us",
        &[
            "GeneTrust is an accredited DNA testing laboratory serving families and legal professionals.",
            "Every sample is processed twice by independent technicians before a result is issued.",
        ],
    ),
    (
        "/services",
        "Our services",
        &[
            "Paternity, maternity and sibling relationship tests with results in 3 to 5 working days.",
            "Legal tests follow a documented chain of custody and are admissible in court.",
            "Ancestry tests trace maternal and paternal lineages.",
        ],
    ),
    (
        "/blogs",
        "Blog",
        &["News about genetic testing, sample collection tips and answers to common questions."],
    ),
    (
        "/contact",
        "Contact",
        &["Call our hotline any day from 7:00 to 21:00, or visit one of our collection centres."],
    ),
];

pub async fn home(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    page(
        &state,
        &session,
        StatusCode::OK,
        "home.html",
        context! { title => "Home", dashboard => session.role.dashboard_path() },
    )
}

pub async fn marketing(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    uri: Uri,
) -> Result<Response> {
    match MARKETING.iter().find(|(path, _, _)| *path == uri.path()) {
        Some((_, title, paragraphs)) => page(
            &state,
            &session,
            StatusCode::OK,
            "page.html",
            context! { title => title, paragraphs => paragraphs },
        ),
        None => not_found_page(&state, &session),
    }
}

// Login, registration, logout

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub registered: Option<String>,
}

pub async fn login_form(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Query(query): Query<LoginQuery>,
) -> Result<Response> {
    page(
        &state,
        &session,
        StatusCode::OK,
        "login.html",
        context! { title => "Sign in", registered => query.registered.is_some(), email => "" },
    )
}

pub async fn login_submit(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let failure = |status: StatusCode, error: String| {
        page(
            &state,
            &session,
            status,
            "login.html",
            context! { title => "Sign in", error => error, email => credentials.email.clone() },
        )
    };

    let remote = match state.remote.login(&credentials).await {
        Ok(remote) => remote,
        Err(e) => {
            tracing::info!("Login failed for {}: {}", credentials.email, e);
            return failure(e.status_code(), remote_error_message(&e));
        }
    };

    let user = remote.user.into_session_user();
    if !user.role.is_authenticated() {
        tracing::warn!("Account {} has no recognised portal role", user.id);
        let e = Error::NoPortalAccess;
        return failure(e.status_code(), e.to_string());
    }

    let token = state.keys.issue(&user, Some(remote.token))?;
    let cookie = session_cookie(&state.config.auth.cookie_name, &token, state.keys.ttl_secs());
    tracing::info!(user = %user.id, role = %user.role, "User signed in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(user.role.dashboard_path()),
    )
        .into_response())
}

#[derive(Debug, Serialize)]
struct InputField {
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    value: String,
}

fn register_fields(form: &RegisterForm) -> Vec<InputField> {
    vec![
        InputField { name: "name", label: "Full name", kind: "text", value: form.name.clone() },
        InputField { name: "email", label: "Email", kind: "email", value: form.email.clone() },
        InputField { name: "phone", label: "Phone (optional)", kind: "tel", value: form.phone.clone() },
        InputField { name: "password", label: "Password", kind: "password", value: String::new() },
        InputField {
            name: "confirm_password",
            label: "Confirm password",
            kind: "password",
            value: String::new(),
        },
    ]
}

fn register_page(
    state: &AppState,
    session: &Session,
    status: StatusCode,
    form: &RegisterForm,
    errors: &FieldErrors,
    error: Option<String>,
) -> Result<Response> {
    page(
        state,
        session,
        status,
        "register.html",
        context! {
            title => "Register",
            fields => register_fields(form),
            errors => errors,
            error => error,
        },
    )
}

pub async fn register_form(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    register_page(
        &state,
        &session,
        StatusCode::OK,
        &RegisterForm::default(),
        &FieldErrors::new(),
        None,
    )
}

pub async fn register_submit(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return register_page(
            &state,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            &errors,
            None,
        );
    }

    match state.remote.register(&form.to_registration()).await {
        Ok(user) => {
            tracing::info!(user = %user.id, "Account registered");
            Ok(Redirect::to("/login?registered=1").into_response())
        }
        Err(e) => register_page(
            &state,
            &session,
            e.status_code(),
            &form,
            &errors,
            Some(remote_error_message(&e)),
        ),
    }
}

pub async fn logout(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Response {
    if let Some(user_id) = &session.user_id {
        tracing::info!(user = %user_id, "User signed out");
    }
    let cookie = clear_session_cookie(&state.config.auth.cookie_name);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

// Booking

#[derive(Debug, Serialize)]
struct ServiceOption {
    value: &'static str,
    label: &'static str,
}

fn booking_page(
    state: &AppState,
    session: &Session,
    status: StatusCode,
    form: &BookingForm,
    errors: &FieldErrors,
    error: Option<String>,
) -> Result<Response> {
    let services: Vec<ServiceOption> = BOOKABLE_SERVICES
        .iter()
        .map(|&(value, label)| ServiceOption { value, label })
        .collect();

    page(
        state,
        session,
        status,
        "booking.html",
        context! {
            title => "Book a test",
            form => form,
            errors => errors,
            error => error,
            services => services,
        },
    )
}

pub async fn booking_form(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    let form = BookingForm {
        full_name: session.name.clone().unwrap_or_default(),
        collection: "home".to_string(),
        ..BookingForm::default()
    };
    booking_page(&state, &session, StatusCode::OK, &form, &FieldErrors::new(), None)
}

pub async fn booking_submit(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Form(form): Form<BookingForm>,
) -> Result<Response> {
    let errors = form.validate(chrono::Local::now().date_naive());
    if !errors.is_empty() {
        return booking_page(
            &state,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            &errors,
            None,
        );
    }

    match state
        .remote
        .create("bookings", &form.to_payload(), session.api_token.as_deref())
        .await
    {
        Ok(_) => {
            tracing::info!(service = %form.service, "Booking submitted");
            Ok(Redirect::to("/customer/orders").into_response())
        }
        Err(e) => booking_page(
            &state,
            &session,
            e.status_code(),
            &form,
            &errors,
            Some(remote_error_message(&e)),
        ),
    }
}

// Profile and dashboards

pub async fn profile(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    page(
        &state,
        &session,
        StatusCode::OK,
        "profile.html",
        context! { title => "Profile", user_id => session.user_id.clone() },
    )
}

#[derive(Debug, Serialize)]
struct ViewLink {
    href: String,
    title: &'static str,
}

pub async fn dashboard(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Path(section): Path<String>,
) -> Result<Response> {
    let Some(title) = catalog::section_title(&section) else {
        return not_found_page(&state, &session);
    };

    let views: Vec<ViewLink> = catalog::views_in(&section)
        .map(|view| ViewLink {
            href: view.href(),
            title: view.title,
        })
        .collect();

    page(
        &state,
        &session,
        StatusCode::OK,
        "dashboard.html",
        context! { title => title, views => views },
    )
}

// Resource views

/// Remote ids end up in a URL path, keep them to one plain segment
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

async fn render_list(
    state: &AppState,
    session: &Session,
    view: &ResourceView,
    notice: Option<(StatusCode, String)>,
) -> Result<Response> {
    let (status, rows, error) = match state
        .remote
        .list(view.api_path, session.api_token.as_deref())
        .await
    {
        Ok(records) => {
            let rows: Vec<_> = records.iter().map(|record| view.row(record)).collect();
            match notice {
                Some((status, message)) => (status, rows, Some(message)),
                None => (StatusCode::OK, rows, None),
            }
        }
        Err(e) => (e.status_code(), Vec::new(), Some(remote_error_message(&e))),
    };

    page(
        state,
        session,
        status,
        "resource_list.html",
        context! {
            title => view.title,
            columns => view.headers(),
            rows => rows,
            base_href => view.href(),
            deletable => view.deletable,
            error => error,
        },
    )
}

pub async fn resource_list(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Path((section, resource)): Path<(String, String)>,
) -> Result<Response> {
    match catalog::find_view(&section, &resource) {
        Some(view) => render_list(&state, &session, view, None).await,
        None => not_found_page(&state, &session),
    }
}

pub async fn resource_detail(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Path((section, resource, id)): Path<(String, String, String)>,
) -> Result<Response> {
    let Some(view) = catalog::find_view(&section, &resource) else {
        return not_found_page(&state, &session);
    };
    if !is_valid_id(&id) {
        return not_found_page(&state, &session);
    }

    let (status, fields, error) = match state
        .remote
        .get(view.api_path, &id, session.api_token.as_deref())
        .await
    {
        Ok(record) => (StatusCode::OK, catalog::detail_fields(&record), None),
        Err(e) => (e.status_code(), Vec::new(), Some(remote_error_message(&e))),
    };

    page(
        &state,
        &session,
        status,
        "resource_detail.html",
        context! {
            title => view.title,
            id => id,
            fields => fields,
            base_href => view.href(),
            error => error,
        },
    )
}

pub async fn resource_delete(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Path((section, resource, id)): Path<(String, String, String)>,
) -> Result<Response> {
    let Some(view) = catalog::find_view(&section, &resource) else {
        return not_found_page(&state, &session);
    };
    if !is_valid_id(&id) {
        return not_found_page(&state, &session);
    }
    if !view.deletable {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    match state
        .remote
        .delete(view.api_path, &id, session.api_token.as_deref())
        .await
    {
        Ok(()) => {
            tracing::info!(resource = %view.api_path, id = %id, "Record deleted");
            Ok(Redirect::to(&view.href()).into_response())
        }
        Err(e) => {
            let notice = (e.status_code(), remote_error_message(&e));
            render_list(&state, &session, view, Some(notice)).await
        }
    }
}

pub async fn not_found(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    not_found_page(&state, &session)
}
