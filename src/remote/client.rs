//! REST client for the remote portal API
//!
//! The portal keeps no data of its own; users, kits, orders and results all
//! live behind this API. Every call forwards the signed-in user's bearer
//! credential untouched.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::auth::{Credentials, Role, SessionUser};
use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// User record as returned by the remote API
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl RemoteUser {
    /// Session identity, unknown remote roles become guests
    pub fn into_session_user(self) -> SessionUser {
        let role = Role::from_claim(&self.role);
        SessionUser {
            id: self.id,
            name: self.name,
            role,
        }
    }
}

/// Successful login payload
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteLogin {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    pub user: RemoteUser,
}

/// Sign-up payload sent to the remote API
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Thin pass-through client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<RemoteLogin> {
        tracing::debug!("Forwarding login for {}", credentials.email);
        self.send(self.request(Method::POST, "auth/login", None).json(credentials))
            .await
    }

    pub async fn register(&self, registration: &Registration) -> Result<RemoteUser> {
        tracing::debug!("Forwarding registration for {}", registration.email);
        self.send(self.request(Method::POST, "auth/register", None).json(registration))
            .await
    }

    pub async fn list(&self, resource: &str, bearer: Option<&str>) -> Result<Vec<Value>> {
        let body: Value = self.send(self.request(Method::GET, resource, bearer)).await?;
        Ok(unwrap_collection(body))
    }

    pub async fn get(&self, resource: &str, id: &str, bearer: Option<&str>) -> Result<Value> {
        let path = format!("{}/{}", resource, id);
        let body: Value = self.send(self.request(Method::GET, &path, bearer)).await?;
        Ok(unwrap_data(body))
    }

    pub async fn create<B: Serialize + ?Sized>(
        &self,
        resource: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<Value> {
        let body: Value = self
            .send(self.request(Method::POST, resource, bearer).json(body))
            .await?;
        Ok(unwrap_data(body))
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        resource: &str,
        id: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<Value> {
        let path = format!("{}/{}", resource, id);
        let body: Value = self
            .send(self.request(Method::PUT, &path, bearer).json(body))
            .await?;
        Ok(unwrap_data(body))
    }

    pub async fn delete(&self, resource: &str, id: &str, bearer: Option<&str>) -> Result<()> {
        let path = format!("{}/{}", resource, id);
        check_status(self.request(Method::DELETE, &path, bearer).send().await?).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`Error::RemoteStatus`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            }
        });

    tracing::warn!("Remote API returned {}: {}", status, message);
    Err(Error::RemoteStatus {
        status: status.as_u16(),
        message,
    })
}

/// Lists arrive either bare or wrapped as `{ "data": [...] }`
fn unwrap_collection(body: Value) -> Vec<Value> {
    match unwrap_data(body) {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
