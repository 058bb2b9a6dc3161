//! CLI interface for the DNA portal

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

use crate::auth::Role;

#[derive(Parser)]
#[command(name = "dna-portal")]
#[command(author = "Krakaw")]
#[command(version = "1.0.0")]
#[command(about = "Customer and staff portal for a DNA testing service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new portal.toml configuration file
    Init {
        /// Write the built-in route table into the file
        #[arg(long)]
        with_rules: bool,
    },

    /// Start the portal web server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the effective route access table
    Routes {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Check whether a role may open a path
    Check {
        /// Role to check as
        #[arg(short, long, value_enum, default_value = "guest")]
        role: Role,

        /// Path to check, e.g. /admin/users
        path: String,
    },

    /// Issue a session token for local testing
    Token {
        /// Role carried by the token
        #[arg(short, long, value_enum)]
        role: Role,

        /// User ID carried by the token
        #[arg(long, default_value = "local-dev")]
        user_id: String,

        /// Display name carried by the token
        #[arg(long, default_value = "Local Developer")]
        name: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
