//! Server-rendered portal pages

pub mod catalog;
pub mod forms;
mod handlers;
mod templates;

pub use handlers::*;
pub use templates::Pages;
