//! HTTP server: JSON API and router assembly

pub mod routes;
pub mod server;

pub use server::*;
