//! DNA Portal - customer and staff portal for a DNA testing service
//!
//! This is the library interface for the portal: the route guard, session
//! handling, the remote API client and the web UI, so they can be embedded
//! and tested without the CLI.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod remote;
pub mod ui;

pub use auth::{Role, Session};
pub use config::Config;
pub use error::Error;
pub use guard::{Decision, Guard, RouteTable};
