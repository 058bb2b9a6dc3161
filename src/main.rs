use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dna_portal::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dna_portal=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { with_rules } => cli::commands::init(with_rules).await,
        Commands::Serve { host, port } => cli::commands::serve(host, port).await,
        Commands::Routes { format } => cli::commands::routes(format).await,
        Commands::Check { role, path } => cli::commands::check(role, &path).await,
        Commands::Token {
            role,
            user_id,
            name,
        } => cli::commands::token(role, user_id, name).await,
    }
}
