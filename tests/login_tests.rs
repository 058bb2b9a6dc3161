//! Login, booking and list views against a stub of the remote API

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dna_portal::api::{create_router, AppState};
use dna_portal::config::Config;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const PASSWORD: &str = "correct-horse";

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn stub_login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }

    let email = body["email"].as_str().unwrap_or_default();
    let role = email.split('@').next().unwrap_or_default();
    Json(json!({
        "token": format!("remote-{}", role),
        "user": { "id": 100, "fullName": format!("{} user", role), "role": role.to_uppercase() }
    }))
    .into_response()
}

async fn stub_kits(headers: HeaderMap) -> Response {
    if bearer(&headers).as_deref() != Some("remote-admin") {
        return (StatusCode::FORBIDDEN, Json(json!({ "message": "Forbidden" }))).into_response();
    }
    Json(json!({
        "data": [
            { "id": 1, "code": "K-001", "name": "Home collection kit", "status": "active" },
            { "id": 2, "code": "K-002", "name": "Legal kit", "status": "retired" }
        ]
    }))
    .into_response()
}

async fn stub_bookings(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers).as_deref() != Some("remote-customer") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Sign in again" }))).into_response();
    }
    (StatusCode::CREATED, Json(json!({ "id": 77, "service": body["service"] }))).into_response()
}

async fn stub_register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@genetrust.test" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({ "id": "new-1", "name": body["name"], "role": "customer" })))
        .into_response()
}

/// Serve the stub on an ephemeral port and return its base URL
async fn spawn_stub_api() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(stub_login))
        .route("/api/auth/register", post(stub_register))
        .route("/api/kits", get(stub_kits))
        .route("/api/bookings", post(stub_bookings));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn portal() -> Router {
    let mut config = Config::default();
    config.api.base_url = spawn_stub_api().await;
    config.api.timeout_secs = 5;
    create_router(Arc::new(AppState::new(config).unwrap()))
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// The `name=value` part of the Set-Cookie header
fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("missing Set-Cookie")
        .to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn login_as(app: &Router, role: &str) -> String {
    let body = format!("email={}%40genetrust.test&password={}", role, PASSWORD);
    let response = send(app, form_post("/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response)
}

#[tokio::test]
async fn test_form_login_redirects_to_dashboard() {
    let app = portal().await;
    let body = format!("email=customer%40genetrust.test&password={}", PASSWORD);

    let response = send(&app, form_post("/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/customer"
    );

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("dna_portal_session="));

    let response = send(&app, get_with_cookie("/customer", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_rerenders_form() {
    let app = portal().await;
    let response = send(
        &app,
        form_post("/login", "email=admin%40genetrust.test&password=nope", None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_text(response).await;
    assert!(body.contains("Invalid email or password"));
    assert!(body.contains("admin@genetrust.test"));
}

#[tokio::test]
async fn test_account_without_portal_role_is_refused() {
    let app = portal().await;
    let body = format!("email=robot%40genetrust.test&password={}", PASSWORD);
    let response = send(&app, form_post("/login", &body, None)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_json_login_sets_cookie_and_returns_user() {
    let app = portal().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "manager@genetrust.test", "password": PASSWORD }).to_string(),
        ))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["data"]["user"]["role"], "manager");
    assert_eq!(body["data"]["user"]["id"], "100");
    assert!(cookie.ends_with(body["data"]["token"].as_str().unwrap()));
}

#[tokio::test]
async fn test_json_login_failure_is_unauthorized() {
    let app = portal().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "admin@genetrust.test", "password": "bad" }).to_string(),
        ))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_json_login_refuses_account_without_portal_role() {
    let app = portal().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "superuser@genetrust.test", "password": PASSWORD }).to_string(),
        ))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_admin_sees_remote_kits() {
    let app = portal().await;
    let cookie = login_as(&app, "admin").await;

    let response = send(&app, get_with_cookie("/admin/kits", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("K-001"));
    assert!(body.contains("Legal kit"));
    assert!(body.contains("Delete</button>"));
}

#[tokio::test]
async fn test_customer_never_reaches_remote_kits() {
    let app = portal().await;
    let cookie = login_as(&app, "customer").await;

    let response = send(&app, get_with_cookie("/admin/kits", &cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn test_customer_booking_flow() {
    let app = portal().await;
    let cookie = login_as(&app, "customer").await;

    let response = send(&app, get_with_cookie("/booking", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let date = (chrono::Local::now().date_naive() + chrono::Duration::days(7)).format("%Y-%m-%d");
    let body = format!(
        "full_name=Tran+Thi+B&phone=0912345678&service=paternity&appointment_date={}&collection=clinic&notes=",
        date
    );
    let response = send(&app, form_post("/booking", &body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/customer/orders"
    );
}

#[tokio::test]
async fn test_invalid_booking_is_rerendered() {
    let app = portal().await;
    let cookie = login_as(&app, "customer").await;

    let body = "full_name=&phone=12&service=paternity&appointment_date=2001-01-01&collection=home";
    let response = send(&app, form_post("/booking", body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let text = body_text(response).await;
    assert!(text.contains("cannot be in the past"));
    assert!(text.contains("9 to 15 digits"));
}

#[tokio::test]
async fn test_registration_flow() {
    let app = portal().await;

    let body = "name=Hoa&email=hoa%40genetrust.test&phone=&password=longpassword&confirm_password=longpassword";
    let response = send(&app, form_post("/register", body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login?registered=1"
    );

    let body = "name=Hoa&email=taken%40genetrust.test&phone=&password=longpassword&confirm_password=longpassword";
    let response = send(&app, form_post("/register", body, None)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Email already registered"));
}
