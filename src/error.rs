//! Error types for the DNA portal

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::routes::ApiResponse;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid route table: {0}")]
    InvalidRouteTable(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Remote API unreachable: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Remote API returned {status}: {message}")]
    RemoteStatus { status: u16, message: String },

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("This account does not have access to the portal")]
    NoPortalAccess,

    #[error("Config file not found. Run 'dna-portal init' first.")]
    ConfigNotFound,
}

impl Error {
    /// HTTP status used when this error reaches a handler boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownRole(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Token(_) => StatusCode::UNAUTHORIZED,
            Error::NoPortalAccess => StatusCode::FORBIDDEN,
            Error::RemoteStatus { status, .. } => match *status {
                401 | 403 => StatusCode::UNAUTHORIZED,
                404 => StatusCode::NOT_FOUND,
                400 | 409 | 422 => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            },
            Error::Remote(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(ApiResponse::<()>::err(self.to_string()))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
