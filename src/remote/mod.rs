//! Client for the remote portal REST API

mod client;

pub use client::{ApiClient, Registration, RemoteLogin, RemoteUser};
